use anyhow::Result;
use fleetwatch::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

async fn build_state_store(cfg: &config::StateStoreConfig) -> Result<Arc<dyn snapshot::KvStore>> {
    match cfg.backend {
        config::StoreBackend::Sqlite => {
            let store = snapshot::SqliteKvStore::connect(&cfg.path).await?;
            store.init().await?;
            tracing::info!(path = %cfg.path, "Using SQLite state store");
            Ok(Arc::new(store))
        }
        config::StoreBackend::Memory => {
            tracing::info!("Using in-memory state store; snapshots will not survive restarts");
            Ok(Arc::new(snapshot::MemoryKvStore::new()))
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let state_store = build_state_store(&app_config.state_store).await?;
    let (snapshot_manager, snapshot_rx) = snapshot::SnapshotManager::new(
        state_store,
        snapshot::SnapshotSettings {
            key: app_config.state_store.key.clone(),
            interval: app_config.snapshot.interval,
            queue_capacity: app_config.snapshot.queue_capacity,
            io_timeout: Duration::from_millis(app_config.state_store.io_timeout_ms),
        },
    );
    let snapshots = Arc::new(snapshot_manager);

    let aggregates = Arc::new(match snapshots.restore().await {
        Some(persisted) => aggregate_store::AggregateStore::from_snapshot(persisted),
        None => aggregate_store::AggregateStore::new(),
    });
    let alerts = Arc::new(alert_ledger::AlertLedger::with_capacity(
        app_config.alerts.history_capacity,
    ));
    let tracker = Arc::new(tracker::AirportTracker::new(
        app_config.tracker.airports.clone(),
    ));

    let archive = if app_config.archive.enabled {
        let sink = archive::FileArchive::new(&app_config.archive.dir)?;
        tracing::info!(dir = %sink.dir().display(), "Archiving flight updates");
        Some(engine::ArchiveTarget {
            sink: Arc::new(sink),
            timeout: Duration::from_millis(app_config.archive.write_timeout_ms),
        })
    } else {
        None
    };

    let engine = Arc::new(engine::FlightEngine::new(engine::EngineDeps {
        classifier: Arc::new(classifier::DemoClassifier),
        aggregates: aggregates.clone(),
        alerts: alerts.clone(),
        snapshots: snapshots.clone(),
        tracker,
        archive,
    }));
    let queries = Arc::new(query::QueryService::new(aggregates.clone(), alerts));

    let (writer_shutdown_tx, writer_shutdown_rx) = tokio::sync::oneshot::channel();
    let (stats_shutdown_tx, stats_shutdown_rx) = tokio::sync::oneshot::channel();
    let writer_handle =
        worker::spawn_snapshot_writer(snapshot_rx, snapshots.clone(), writer_shutdown_rx);
    let stats_handle = worker::spawn_stats_reporter(
        engine.clone(),
        app_config.monitoring.stats_log_interval_secs,
        stats_shutdown_rx,
    );

    let app = routes::app(engine, queries);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Received shutdown signal");
        })
        .await?;

    let _ = stats_shutdown_tx.send(());
    let _ = writer_shutdown_tx.send(());
    let _ = stats_handle.await;
    let _ = writer_handle.await;

    snapshots.persist_logged(&aggregates.snapshot_view()).await;
    tracing::info!(
        total_active = aggregates.total_active(),
        snapshots_saved_total = snapshots.saved_total(),
        "Final snapshot written; exiting"
    );

    Ok(())
}
