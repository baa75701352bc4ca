use std::collections::HashMap;

use reqwest::Client;
use serde_json::Value;

use crate::model::Coordinates;
use crate::request::request_json;
use crate::{info_time, warn_time};

/// Marker label -> position.
pub type CoordinateMap = HashMap<String, Coordinates>;

/// Fetches the marker json and extracts the markers of `marker_set`.
/// Any failure along the way is logged and yields an empty map; the pipeline
/// treats that as "no coordinates available".
pub async fn fetch_coordinates(client: &Client, url: &str, marker_set: &str) -> CoordinateMap {
    match request_json(client, url).await {
        Ok(body) => {
            let coords = parse_markers(&body, marker_set);
            info_time!("Found {} labelled markers in set {marker_set}", coords.len());
            coords
        }
        Err(e) => {
            warn_time!("Couldn't fetch coordinates from {url}: {e}");
            CoordinateMap::new()
        }
    }
}

/// Walks `sets.<marker_set>.markers` and keys each labelled marker by its label.
/// Markers are visited in document order, so a repeated label keeps the last one.
/// A missing level anywhere on the path gives an empty map.
pub fn parse_markers(body: &Value, marker_set: &str) -> CoordinateMap {
    let Some(markers) = body
        .get("sets")
        .and_then(|sets| sets.get(marker_set))
        .and_then(|set| set.get("markers"))
        .and_then(Value::as_object)
    else {
        return CoordinateMap::new();
    };

    markers
        .values()
        .filter_map(|marker| {
            let label = marker.get("label")?.as_str()?;
            if label.is_empty() {
                return None;
            }
            Some((label.to_string(), axes_of(marker)))
        })
        .collect()
}

fn axes_of(marker: &Value) -> Coordinates {
    let axis = |key: &str| match marker.get(key) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    };
    Coordinates {
        x: axis("x"),
        y: axis("y"),
        z: axis("z"),
    }
}
