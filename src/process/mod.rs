// src/process/mod.rs

use scraper::{Html, Selector};
use tracing::debug;

pub mod aggregate;
pub mod error;
pub mod normalize;
pub mod rates;
pub mod schema;

use error::ProcessError;

/// One scraped country table.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub country_name: String,
    pub country_region: String,
    pub rows: Vec<RawLcRow>,
}

/// One `<tr>` of the dashboard table.
#[derive(Debug, Clone)]
pub struct RawLcRow {
    pub lc_name: String,
    /// Closure indicator. The dashboard writes closure markers into the
    /// LC-name cell, so the extractor copies that cell here.
    pub status: String,
    /// Stage-count cells in schema order (`schema::stage_columns`).
    pub cells: Vec<String>,
}

/// CSS id of the dashboard table that carries one row per LC.
const LC_TABLE_SELECTOR: &str = "table#signups-table";

/// Parse a country's analytics page into a `RawTable`.
///
/// Rows without `<td>` cells (header rows) are skipped. Cell text is
/// trimmed. An empty table is not an error; a missing table is.
pub fn extract_lc_table(
    html: &str,
    country_name: &str,
    country_region: &str,
) -> Result<RawTable, ProcessError> {
    let table_selector =
        Selector::parse(LC_TABLE_SELECTOR).expect("invalid CSS selector for the LC table");
    let row_selector = Selector::parse("tr").expect("invalid CSS selector for table rows");
    let cell_selector = Selector::parse("td").expect("invalid CSS selector for table cells");

    let document = Html::parse_document(html);
    let table = document
        .select(&table_selector)
        .next()
        .ok_or(ProcessError::MissingTable)?;

    let mut rows = Vec::new();
    for tr in table.select(&row_selector) {
        let cells: Vec<String> = tr
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>().trim().to_string())
            .collect();
        if cells.is_empty() {
            continue;
        }
        rows.push(RawLcRow {
            lc_name: cells[0].clone(),
            status: cells[0].clone(),
            cells: cells[1..].to_vec(),
        });
    }

    debug!(country = country_name, rows = rows.len(), "extracted LC table");
    Ok(RawTable {
        country_name: country_name.to_string(),
        country_region: country_region.to_string(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rows_and_skips_headers() {
        let html = r#"
            <html><body>
            <table id="signups-table">
                <tr><th>LC</th><th>Total Signups</th></tr>
                <tr><td> LC25 </td><td>20</td><td>10</td></tr>
                <tr><td>[Closed]</td><td>0</td><td>0</td></tr>
            </table>
            </body></html>
        "#;
        let table = extract_lc_table(html, "Chile", "LAC").unwrap();
        assert_eq!(table.country_name, "Chile");
        assert_eq!(table.country_region, "LAC");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].lc_name, "LC25");
        assert_eq!(table.rows[0].status, "LC25");
        assert_eq!(table.rows[0].cells, vec!["20", "10"]);
        // the closure marker lands in `status`
        assert_eq!(table.rows[1].status, "[Closed]");
    }

    #[test]
    fn missing_table_is_an_error() {
        let html = "<html><body><table id=\"other\"></table></body></html>";
        let err = extract_lc_table(html, "Chile", "LAC").unwrap_err();
        assert!(matches!(err, ProcessError::MissingTable));
    }

    #[test]
    fn empty_table_yields_empty_rows() {
        let html = r#"<table id="signups-table"><tr><th>LC</th></tr></table>"#;
        let table = extract_lc_table(html, "Chile", "LAC").unwrap();
        assert!(table.rows.is_empty());
    }
}
