// src/countries.rs

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::{collections::BTreeMap, path::Path};
use tracing::{info, warn};

/// Reference data for one country, keyed by its dashboard id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryInfo {
    pub name: String,
    pub region: String,
}

#[derive(Debug, Deserialize)]
struct CountryRow {
    #[serde(rename = "Country_ID")]
    id: String,
    #[serde(rename = "Country_Name")]
    name: String,
    #[serde(rename = "Country_Region")]
    region: String,
}

/// Load the country-codes CSV (comma-separated, headers
/// `Country_ID,Country_Name,Country_Region`).
///
/// Rows that do not deserialize or whose id does not parse are skipped
/// with a warning. A duplicate id is overwritten by the last entry, also
/// with a warning. Names and regions are trimmed.
pub fn load<P: AsRef<Path>>(path: P) -> Result<BTreeMap<u32, CountryInfo>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to open country codes CSV {}", path.display()))?;

    let mut countries = BTreeMap::new();
    for (idx, result) in reader.deserialize::<CountryRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(record = idx, %err, "skipping unreadable country row");
                continue;
            }
        };
        let id: u32 = match row.id.trim().parse() {
            Ok(id) => id,
            Err(_) => {
                warn!(record = idx, id = %row.id, "skipping row with unparsable country id");
                continue;
            }
        };
        let info = CountryInfo {
            name: row.name.trim().to_string(),
            region: row.region.trim().to_string(),
        };
        if countries.insert(id, info).is_some() {
            warn!(id, "duplicate country id; keeping the last entry");
        }
    }

    info!(
        count = countries.len(),
        path = %path.display(),
        "loaded country codes"
    );
    Ok(countries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn codes_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_trims_entries() {
        let file = codes_file(
            "Country_ID,Country_Name,Country_Region\n1566, Chile , LAC \n572,Afghanistan,MEA\n",
        );
        let countries = load(file.path()).unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(
            countries[&1566],
            CountryInfo {
                name: "Chile".to_string(),
                region: "LAC".to_string(),
            }
        );
    }

    #[test]
    fn duplicate_id_keeps_the_last_entry() {
        let file = codes_file(
            "Country_ID,Country_Name,Country_Region\n1566,Chile,LAC\n1566,Chile (new),LAC\n",
        );
        let countries = load(file.path()).unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[&1566].name, "Chile (new)");
    }

    #[test]
    fn unparsable_id_is_skipped_not_fatal() {
        let file = codes_file(
            "Country_ID,Country_Name,Country_Region\nnot-a-number,Nowhere,XXX\n1566,Chile,LAC\n",
        );
        let countries = load(file.path()).unwrap();
        assert_eq!(countries.len(), 1);
        assert!(countries.contains_key(&1566));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load("definitely/not/here.csv").is_err());
    }
}
