//! Live wiki search: fetches MediaWiki's search page and parses the result list.

use reqwest::Client;
use scraper::Html;
use serde::Serialize;
use tokio::task::spawn_blocking;

use crate::request::request_page_html_with_query;
use crate::wiki::{create_selector, stripped_text};
use crate::{info_time, warn_time, Result};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Result of a live search. Callers decide whether `Failed` is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(Vec<SearchHit>),
    Empty,
    Failed(String),
}

/// Runs a full-text search against the wiki at `wiki_base`.
/// A blank query is `Empty` without touching the network.
pub async fn search_wiki(client: &Client, wiki_base: &str, query: &str) -> SearchOutcome {
    let query = query.trim();
    if query.is_empty() {
        return SearchOutcome::Empty;
    }

    let url = format!("{}/index.php", wiki_base.trim_end_matches('/'));
    let params = [
        ("search", query),
        ("title", "Special:Search"),
        ("fulltext", "1"),
    ];
    let html = match request_page_html_with_query(client, &url, &params).await {
        Ok(html) => html,
        Err(e) => {
            warn_time!("Wiki search for {query:?} failed: {e}");
            return SearchOutcome::Failed(format!("Request failed: {e}"));
        }
    };

    let base = wiki_base.trim_end_matches('/').to_string();
    let parsed = spawn_blocking(move || parse_search_results(&html, &base)).await;
    match parsed {
        Ok(Ok(hits)) if hits.is_empty() => SearchOutcome::Empty,
        Ok(Ok(hits)) => {
            info_time!("Wiki search for {:?}: {} hits", query, hits.len());
            SearchOutcome::Found(hits)
        }
        Ok(Err(e)) => SearchOutcome::Failed(format!("An error occurred during processing: {e}")),
        Err(e) => SearchOutcome::Failed(format!("An error occurred during processing: {e}")),
    }
}

/// Parses a MediaWiki search results page. Hits are made absolute against `wiki_base`;
/// missing pieces become `N/A`. A page without a result list has no hits.
pub fn parse_search_results(html: &str, wiki_base: &str) -> Result<Vec<SearchHit>> {
    let doc = Html::parse_document(html);
    let list_selector = create_selector("ul.mw-search-results")?;
    let item_selector = create_selector("li.mw-search-result")?;
    let title_selector = create_selector("div.mw-search-result-heading a")?;
    let snippet_selector = create_selector("div.searchresult")?;

    let Some(list) = doc.select(&list_selector).next() else {
        return Ok(Vec::new());
    };

    let hits = list
        .select(&item_selector)
        .map(|item| {
            let title_link = item.select(&title_selector).next();
            let title = title_link
                .map(stripped_text)
                .unwrap_or_else(|| NOT_AVAILABLE.into());
            let url = title_link
                .and_then(|a| a.value().attr("href"))
                .map(|href| format!("{wiki_base}{href}"))
                .unwrap_or_else(|| NOT_AVAILABLE.into());
            let snippet = item
                .select(&snippet_selector)
                .next()
                .map(stripped_text)
                .unwrap_or_else(|| NOT_AVAILABLE.into());
            SearchHit { title, url, snippet }
        })
        .collect();
    Ok(hits)
}
