use std::path::Path;

use chrono::Local;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::{fs, io::AsyncWriteExt};

use crate::model::LandmarkRecord;
use crate::{info_time, Result};

/// Writes the records as 4-space indented UTF-8 JSON, creating parent directories.
/// Any existing file is replaced; the write is not atomic.
pub async fn save_records(path: &Path, records: &[LandmarkRecord]) -> Result<()> {
    let start_time = Local::now();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut ser)?;

    let mut file = fs::File::create(path).await?;
    file.write_all(&buf).await?;
    file.flush().await?;
    info_time!(start_time, "Wrote {} landmarks to file: {}", records.len(), path.display());
    Ok(())
}

/// Reads a dataset file back. A missing file is an empty dataset.
pub async fn load_records(path: &Path) -> Result<Vec<LandmarkRecord>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
}
