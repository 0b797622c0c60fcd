//! Test server harness.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use leaderboard::metrics::RecordingMetrics;
use leaderboard::scoring::MockScorer;
use leaderboard::{App, Config, LeaderboardHandle};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub workers: usize,
    pub snapshot_path: Option<PathBuf>,
    pub score_delay: Option<Duration>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            snapshot_path: None,
            score_delay: None,
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub leaderboard: LeaderboardHandle,
    pub metrics: Arc<RecordingMetrics>,
    server_handle: Option<JoinHandle<anyhow::Result<()>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops HTTP and waits for the ordered shutdown to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .expect("server task panicked")
                .expect("server returned an error");
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns the full service on an ephemeral port with a deterministic scorer.
///
/// The scorer returns each event's raw metric as its score, so tests can predict the board.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let app_config = Config {
        input_capacity: 64,
        output_capacity: 64,
        workers: config.workers,
        snapshot_path: config.snapshot_path,
        shutdown_timeout: Duration::from_secs(5),
        ..Default::default()
    };

    let scorer = match config.score_delay {
        Some(delay) => MockScorer::identity().with_delay(delay),
        None => MockScorer::identity(),
    };
    let metrics = Arc::new(RecordingMetrics::new());

    let app = App::start(app_config, Arc::new(scorer), metrics.clone(), None)
        .await
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let leaderboard = app.leaderboard().clone();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(app.serve(listener, async move {
        let _ = shutdown_rx.await;
    }));

    Ok(TestServer {
        addr,
        leaderboard,
        metrics,
        server_handle: Some(server_handle),
        shutdown_tx: Some(shutdown_tx),
    })
}

/// Polls until `check` holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
