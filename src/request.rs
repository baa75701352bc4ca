use chrono::Local;
use reqwest::Client;

use crate::{info_time, Result};

/// Requests a page and returns a `Result<String>` containing the HTML.
/// Non-2xx statuses are turned into an error.
pub(crate) async fn request_page_html(client: &Client, url: &str) -> Result<String> {
    let start_time = Local::now();
    let res = client.get(url).send().await?.error_for_status()?;
    let html = res.text().await?;
    info_time!(start_time, "Fetched page: {url} ({} bytes)", html.len());
    Ok(html)
}

/// Same as `request_page_html` but with query parameters appended to the url.
pub(crate) async fn request_page_html_with_query(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String> {
    let res = client.get(url).query(query).send().await?.error_for_status()?;
    Ok(res.text().await?)
}

/// Requests a JSON document. Transport errors, bad statuses and undecodable bodies
/// all come back as `Err`.
pub(crate) async fn request_json(client: &Client, url: &str) -> Result<serde_json::Value> {
    let start_time = Local::now();
    let res = client.get(url).send().await?.error_for_status()?;
    let body = res.bytes().await?;
    let value = serde_json::from_slice(&body)?;
    info_time!(start_time, "Fetched json: {url} ({} bytes)", body.len());
    Ok(value)
}
