// Raw-event archival: each accepted payload written as a named JSON blob.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Destination for archived events.
#[async_trait::async_trait]
pub trait ArchiveSink: Send + Sync {
    async fn write_blob(&self, name: &str, contents: Vec<u8>) -> anyhow::Result<()>;
}

/// Writes each blob as a file under one directory.
#[derive(Debug, Clone)]
pub struct FileArchive {
    dir: PathBuf,
}

impl FileArchive {
    pub fn new(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl ArchiveSink for FileArchive {
    async fn write_blob(&self, name: &str, contents: Vec<u8>) -> anyhow::Result<()> {
        tokio::fs::write(self.dir.join(name), contents).await?;
        Ok(())
    }
}

/// `{timestamp, flight}` with the payload exactly as decoded.
pub fn archive_record(payload: &Value, at: DateTime<Utc>) -> Value {
    json!({
        "timestamp": at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
        "flight": payload,
    })
}

/// `flight-{icao24}-{YYYYmmdd-HHMMSS-mmm}.json`; `unknown` when the payload has no usable icao24.
pub fn archive_file_name(payload: &Value, at: DateTime<Utc>) -> String {
    let icao24 = payload
        .get("icao24")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("unknown");
    format!("flight-{}-{}.json", icao24, at.format("%Y%m%d-%H%M%S-%3f"))
}

/// Spawns the write so ingestion never waits on the sink. Failures and timeouts are logged.
pub fn spawn_archive(sink: Arc<dyn ArchiveSink>, payload: &Value, timeout: Duration) {
    let now = Utc::now();
    let name = archive_file_name(payload, now);
    let contents = match serde_json::to_vec(&archive_record(payload, now)) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, operation = "archive_event", "could not encode archive record");
            return;
        }
    };
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        warn!(operation = "archive_event", "no async runtime; archive write skipped");
        return;
    };
    handle.spawn(async move {
        match tokio::time::timeout(timeout, sink.write_blob(&name, contents)).await {
            Ok(Ok(())) => debug!(file = %name, "Archived flight update"),
            Ok(Err(e)) => warn!(error = %e, file = %name, operation = "archive_event", "archive write failed"),
            Err(_) => warn!(file = %name, operation = "archive_event", "archive write timed out"),
        }
    });
}
