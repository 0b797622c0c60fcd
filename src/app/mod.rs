//! Process wiring: builds every component from [`Config`], serves HTTP and shuts down in order.
//!
//! Shutdown order:
//! 1. HTTP stops accepting (no more producers).
//! 2. The shutdown token fires; the snapshot worker saves one last time.
//! 3. [`ScoringPipeline::shutdown`] closes input, drains it and waits for every worker.
//! 4. The consumer sees the output queue close and exits.
//!
//! Steps 2 to 4 share one deadline (`Config::shutdown_timeout`).


use std::future::Future;
use std::sync::Arc;

use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::dedup::{
    DedupCacheHandle, FileSnapshotStore, NoopSnapshotStore, SnapshotStore, run_snapshot_worker,
};
use crate::gateway::{HandlerState, create_router_with_state};
use crate::ingest::EventIngestor;
use crate::leaderboard::{LeaderboardHandle, run_consumer};
use crate::metrics::IngestMetrics;
use crate::scoring::{Scorer, ScoringPipeline};

/// A running leaderboard service (everything except the HTTP listener).
pub struct App {
    config: Config,
    ingestor: EventIngestor,
    leaderboard: LeaderboardHandle,
    prometheus: Option<PrometheusHandle>,
    pipeline: ScoringPipeline,
    consumer: JoinHandle<u64>,
    snapshot_worker: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl App {
    /// Restores dedup state and starts the pipeline, the consumer and the snapshot worker.
    pub async fn start(
        config: Config,
        scorer: Arc<dyn Scorer>,
        metrics: Arc<dyn IngestMetrics>,
        prometheus: Option<PrometheusHandle>,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let dedup = DedupCacheHandle::new();
        let store: Arc<dyn SnapshotStore> = match &config.snapshot_path {
            Some(path) => Arc::new(FileSnapshotStore::new(path)),
            None => Arc::new(NoopSnapshotStore),
        };
        if let Err(e) = dedup.restore(store.as_ref()).await {
            warn!(error = %e, "failed to restore dedup snapshot, starting empty");
        }

        let (pipeline, scored) = ScoringPipeline::start(config.pipeline_config(), scorer)?;

        let leaderboard = LeaderboardHandle::new();
        let consumer = tokio::spawn(run_consumer(leaderboard.clone(), scored, metrics.clone()));

        let shutdown = CancellationToken::new();
        let snapshot_worker = config.snapshot_path.as_ref().map(|_| {
            tokio::spawn(run_snapshot_worker(
                dedup.clone(),
                store,
                config.snapshot_interval,
                shutdown.clone(),
            ))
        });

        let ingestor = EventIngestor::new(dedup, pipeline.handle(), metrics);

        info!(
            name = %config.name,
            workers = pipeline.worker_count(),
            snapshots = config.snapshot_path.is_some(),
            "leaderboard service started"
        );

        Ok(Self {
            config,
            ingestor,
            leaderboard,
            prometheus,
            pipeline,
            consumer,
            snapshot_worker,
            shutdown,
        })
    }

    /// Builds the HTTP router over this app's components.
    pub fn router(&self) -> Router {
        let state = HandlerState::new(self.ingestor.clone(), self.leaderboard.clone())
            .with_metrics(self.prometheus.clone());
        create_router_with_state(state)
    }

    pub fn ingestor(&self) -> &EventIngestor {
        &self.ingestor
    }

    pub fn leaderboard(&self) -> &LeaderboardHandle {
        &self.leaderboard
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serves HTTP on `listener` until `signal` completes, then shuts down.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(addr = %addr, "server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await?;
        info!("http server stopped");

        self.shutdown().await;
        Ok(())
    }

    /// Stops background work in order. Returns `false` if the deadline expired first.
    pub async fn shutdown(self) -> bool {
        let Self {
            config,
            ingestor,
            shutdown,
            snapshot_worker,
            pipeline,
            consumer,
            ..
        } = self;
        drop(ingestor);

        let sequence = async move {
            shutdown.cancel();
            if let Some(worker) = snapshot_worker {
                if let Err(e) = worker.await {
                    error!(error = %e, "snapshot worker panicked");
                }
            }

            pipeline.shutdown().await;

            match consumer.await {
                Ok(applied) => info!(applied, "leaderboard drained"),
                Err(e) => error!(error = %e, "leaderboard worker panicked"),
            }
        };

        match tokio::time::timeout(config.shutdown_timeout, sequence).await {
            Ok(()) => {
                info!(name = %config.name, "shutdown complete");
                true
            }
            Err(_) => {
                warn!(
                    timeout_secs = config.shutdown_timeout.as_secs_f64(),
                    "shutdown deadline expired, exiting anyway"
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("leaderboard", &self.leaderboard)
            .field("workers", &self.pipeline.worker_count())
            .finish()
    }
}
