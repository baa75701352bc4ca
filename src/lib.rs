//! LANDMARK SCRAPER
//! Pulls resonance landmarks from the RIA wiki, joins them with the map's marker
//! coordinates, writes one JSON file per dataset and serves those files over HTTP.

mod error;
mod macros;
mod request;

pub mod coords;
pub mod dataset;
pub mod merge;
pub mod model;
pub mod process;
pub mod search;
pub mod server;
pub mod store;
pub mod wiki;

pub use error::{Error, Result};

const ZTH_WIKI_URL: &str =
    "https://wiki.ria.red/wiki/%E6%A8%A1%E6%9D%BF:%E9%9B%B6%E6%B4%B2%E5%85%B1%E9%B8%A3%E5%9C%B0%E6%A0%87";
const ZTH_COORDINATES_URL: &str =
    "https://satellite.ria.red/map/_zth/tiles/_markers_/marker_world.json";
const HOUTU_WIKI_URL: &str =
    "https://wiki.ria.red/wiki/%E6%A8%A1%E6%9D%BF:%E5%90%8E%E5%9C%9F%E6%B4%B2%E5%85%B1%E9%B8%A3%E5%9C%B0%E6%A0%87";
const HOUTU_COORDINATES_URL: &str =
    "https://satellite.ria.red/map/_houtu/tiles/_markers_/marker_world.json";

/// Key under `sets` holding the resonance landmark markers.
const MARKER_SET: &str = "Tori";
/// Every landmark of the grouped dataset carries this grade.
const GROUPED_GRADE: &str = "白级";
/// Placeholder for a missing grade or coordinate axis.
pub const UNKNOWN: &str = "Unknown";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_STATIC_DIR: &str = "./static";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";
pub const WIKI_BASE_URL: &str = "https://wiki.ria.red";
