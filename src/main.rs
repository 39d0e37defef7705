use anyhow::Result;
use chrono::Local;
use lcscraper::{
    countries, fetch,
    process::{self, aggregate, normalize, rates},
    snapshot,
};
use std::{fs, path::PathBuf};
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const AGGREGATED_STEM: &str = "aiesec_lc_data";
const RATES_STEM: &str = "aiesec_lc_data_conversion_rates";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure paths ──────────────────────────────────────────
    let data_dir = PathBuf::from("data");
    let codes_path = data_dir.join("codigos.csv");
    fs::create_dir_all(&data_dir)?;

    // ─── 3) load country reference data ──────────────────────────────
    let countries = countries::load(&codes_path)?;
    if countries.is_empty() {
        anyhow::bail!("no country codes loaded from {}", codes_path.display());
    }
    info!("{} countries to scrape", countries.len());

    // ─── 4) fetch + normalize each country ───────────────────────────
    let client = fetch::pages::client()?;
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for (&country_id, country) in &countries {
        let html = match fetch::pages::country_page(&client, country_id).await {
            Ok(html) => html,
            Err(e) => {
                error!(country = %country.name, "fetch failed: {e:#}");
                continue;
            }
        };
        let raw = match process::extract_lc_table(&html, &country.name, &country.region) {
            Ok(raw) => raw,
            Err(e) => {
                error!(country = %country.name, "extraction failed: {e}");
                continue;
            }
        };
        // a table that violates the schema contract skips its country,
        // never the whole run
        match normalize::normalize(&raw) {
            Ok(normalized) => {
                info!(
                    country = %country.name,
                    rows = normalized.records.len(),
                    "normalized"
                );
                records.extend(normalized.records);
                warnings.extend(normalized.warnings);
            }
            Err(e) => error!(country = %country.name, "normalization failed: {e}"),
        }
        sleep(fetch::pages::REQUEST_DELAY).await;
    }
    for warning in &warnings {
        warn!("{warning}");
    }
    if records.is_empty() {
        warn!("no LC rows scraped; nothing to write");
        return Ok(());
    }

    // ─── 5) aggregate + conversion rates ─────────────────────────────
    let aggregated = aggregate::aggregate(&records, Local::now().date_naive());
    let rates::Rates {
        records: rate_rows,
        warnings: rate_warnings,
    } = rates::compute_rates(&aggregated);
    for warning in &rate_warnings {
        warn!("{warning}");
    }

    // ─── 6) write snapshots ──────────────────────────────────────────
    let now = Local::now().naive_local();
    snapshot::write_pair(&data_dir, AGGREGATED_STEM, &aggregated, now)?;
    snapshot::write_pair(&data_dir, RATES_STEM, &rate_rows, now)?;

    info!(lc_program_rows = aggregated.len(), "all done");
    Ok(())
}
