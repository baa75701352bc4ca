use std::path::Path;

use chrono::Local;
use reqwest::Client;
use tokio::task::spawn_blocking;

use crate::coords::fetch_coordinates;
use crate::dataset::DatasetConfig;
use crate::merge::merge;
use crate::request::request_page_html;
use crate::store::save_records;
use crate::wiki::WikiLandmarks;
use crate::{info_time, warn_time, Result};

/// What a scrape run produced for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeReport {
    pub dataset: &'static str,
    pub total: usize,
    pub with_coordinates: usize,
}

/// Scrapes every dataset in turn and writes each one's file under `data_dir`.
pub async fn process_datasets(
    client: &Client,
    datasets: &[DatasetConfig],
    data_dir: &Path,
) -> Result<Vec<ScrapeReport>> {
    let start_time = Local::now();
    let mut reports = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        reports.push(process_dataset(client, dataset, data_dir).await?);
    }
    info_time!(start_time, "Finished PROCESSING ALL datasets.");
    Ok(reports)
}

/// Coordinates first, then the wiki page, then merge and save.
/// Fetch and parse failures degrade to empty data; only the file write can fail.
pub async fn process_dataset(
    client: &Client,
    dataset: &DatasetConfig,
    data_dir: &Path,
) -> Result<ScrapeReport> {
    let start_time = Local::now();
    info_time!("Started scraping dataset: {}", dataset.name);

    let coords = fetch_coordinates(client, &dataset.coordinates_url, &dataset.marker_set).await;
    let landmarks = scrape_wiki(client, dataset).await;
    info_time!("Parsed {} landmarks from the wiki", landmarks.len());

    let records = merge(landmarks, &coords, &dataset.tables);
    let with_coordinates = records.iter().filter(|r| r.coordinates.is_known()).count();
    if records.is_empty() {
        warn_time!("No landmarks for dataset {}; writing an empty list", dataset.name);
    }

    save_records(&dataset.output_path(data_dir), &records).await?;
    info_time!(
        start_time,
        "Processed dataset {}: {} landmarks, {} with coordinates",
        dataset.name,
        records.len(),
        with_coordinates
    );

    Ok(ScrapeReport {
        dataset: dataset.name,
        total: records.len(),
        with_coordinates,
    })
}

/// Fetches and parses the dataset's wiki page, logging and returning nothing on failure.
async fn scrape_wiki(client: &Client, dataset: &DatasetConfig) -> WikiLandmarks {
    match fetch_and_parse(client, dataset).await {
        Ok(landmarks) => landmarks,
        Err(e) => {
            warn_time!("Couldn't scrape wiki page {}: {e}", dataset.wiki_url);
            WikiLandmarks::empty_like(&dataset.layout)
        }
    }
}

async fn fetch_and_parse(client: &Client, dataset: &DatasetConfig) -> Result<WikiLandmarks> {
    let html = request_page_html(client, &dataset.wiki_url).await?;
    let layout = dataset.layout.clone();
    spawn_blocking(move || layout.parse(&html)).await?
}
