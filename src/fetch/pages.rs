// src/fetch/pages.rs

use anyhow::Result;
use reqwest::{header, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

/// Root of the analytics dashboard; country pages live at
/// `{BASE_URL}{country_id}/{VIEW_SUFFIX}`.
const BASE_URL: &str = "https://core.aiesec.org.eg/analytics/";
/// Dashboard view that carries the per-LC signup table.
const VIEW_SUFFIX: &str = "LC25/";
const USER_AGENT: &str = "lcscraper/0.1 (Contact: data-team@example.com)";

/// Pause between country requests, to stay polite to the dashboard.
pub const REQUEST_DELAY: Duration = Duration::from_secs(1);

const MAX_RETRIES: usize = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Build the persistent session used for every dashboard request.
pub fn client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        header::HeaderValue::from_static(USER_AGENT),
    );
    let client = Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Analytics URL for one country.
pub fn country_url(country_id: u32) -> Result<Url> {
    let base = Url::parse(BASE_URL)?;
    Ok(base.join(&format!("{country_id}/{VIEW_SUFFIX}"))?)
}

/// Fetch the analytics page for one country, retrying transient request
/// failures.
pub async fn country_page(client: &Client, country_id: u32) -> Result<String> {
    let url = country_url(country_id)?;
    info!(country_id, %url, "fetching analytics page");

    let mut attempt = 0;
    loop {
        attempt += 1;
        match client.get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => match resp.text().await {
                Ok(html) => {
                    debug!(country_id, bytes = html.len(), "fetched page");
                    return Ok(html);
                }
                Err(_) if attempt < MAX_RETRIES => sleep(RETRY_DELAY).await,
                Err(e) => return Err(e.into()),
            },
            Ok(resp) => return Err(anyhow::anyhow!("HTTP error: {}", resp.status())),
            Err(_) if attempt < MAX_RETRIES => sleep(RETRY_DELAY).await,
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_url_joins_cleanly() {
        let url = country_url(1566).unwrap();
        assert_eq!(
            url.as_str(),
            "https://core.aiesec.org.eg/analytics/1566/LC25/"
        );
    }
}
