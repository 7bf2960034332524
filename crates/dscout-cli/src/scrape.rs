//! `dscout scrape` — fetch a coupon page, run the discovery cascade, and
//! emit the resulting records as JSON.

use anyhow::Context;
use dscout_core::AppConfig;
use dscout_scraper::{
    build_http_client, detect_site, fetch_html, registry, scrape_page, ScrapeError,
};

/// Fetches and scrapes one page. Records go to stdout as a JSON array; the
/// summary line goes to stderr so piped output stays clean.
pub async fn run(config: &AppConfig, url: &str, site_key: Option<&str>) -> anyhow::Result<()> {
    let site = match site_key {
        Some(key) => registry()
            .iter()
            .find(|c| c.key == key)
            .with_context(|| format!("unknown site key '{key}'"))?,
        None => detect_site(url).ok_or_else(|| ScrapeError::UnknownSite {
            url: url.to_owned(),
        })?,
    };
    tracing::info!(site = site.key, url, "scraping");

    let client = build_http_client(
        config.scraper_request_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let html = fetch_html(&client, url, &config.scraper_user_agent).await?;

    let records = scrape_page(&html, site, url);
    println!("{}", serde_json::to_string_pretty(&records)?);
    eprintln!("scraped {} records from {} ({})", records.len(), url, site.key);

    Ok(())
}
