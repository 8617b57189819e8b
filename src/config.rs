use serde::Deserialize;

use crate::alert_ledger::DEFAULT_HISTORY_CAPACITY;
use crate::snapshot::{DEFAULT_SNAPSHOT_INTERVAL, DEFAULT_SNAPSHOT_KEY};
use crate::tracker::AirportConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub state_store: StateStoreConfig,
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateStoreConfig {
    pub backend: StoreBackend,
    /// SQLite file path; ignored by the memory backend.
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_state_key")]
    pub key: String,
    /// Bound on each state-store read or write.
    pub io_timeout_ms: u64,
}

fn default_state_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Persist after this many events.
    #[serde(default = "default_snapshot_interval")]
    pub interval: u64,
    /// Snapshots waiting for the writer task before triggers are skipped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_snapshot_interval() -> u64 {
    DEFAULT_SNAPSHOT_INTERVAL
}

fn default_queue_capacity() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    pub history_capacity: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub enabled: bool,
    pub dir: String,
    pub write_timeout_ms: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: "data/archive".into(),
            write_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to log app stats (events, alerts, snapshots saved) at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub airports: Vec<AirportConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.state_store.backend != StoreBackend::Sqlite || !self.state_store.path.is_empty(),
            "state_store.path must be non-empty for the sqlite backend"
        );
        anyhow::ensure!(
            !self.state_store.key.is_empty(),
            "state_store.key must be non-empty"
        );
        anyhow::ensure!(
            self.state_store.io_timeout_ms > 0,
            "state_store.io_timeout_ms must be > 0, got {}",
            self.state_store.io_timeout_ms
        );
        anyhow::ensure!(
            self.snapshot.interval > 0,
            "snapshot.interval must be > 0, got {}",
            self.snapshot.interval
        );
        anyhow::ensure!(
            self.snapshot.queue_capacity > 0,
            "snapshot.queue_capacity must be > 0, got {}",
            self.snapshot.queue_capacity
        );
        anyhow::ensure!(
            self.alerts.history_capacity > 0,
            "alerts.history_capacity must be > 0, got {}",
            self.alerts.history_capacity
        );
        if self.archive.enabled {
            anyhow::ensure!(
                !self.archive.dir.is_empty(),
                "archive.dir must be non-empty when archive.enabled"
            );
            anyhow::ensure!(
                self.archive.write_timeout_ms > 0,
                "archive.write_timeout_ms must be > 0, got {}",
                self.archive.write_timeout_ms
            );
        }
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        for airport in &self.tracker.airports {
            anyhow::ensure!(
                !airport.icao.is_empty(),
                "tracker.airports entries need a non-empty icao"
            );
            anyhow::ensure!(
                airport.radius_km > 0.0,
                "tracker.airports[{}].radius_km must be > 0, got {}",
                airport.icao,
                airport.radius_km
            );
        }
        Ok(())
    }
}
