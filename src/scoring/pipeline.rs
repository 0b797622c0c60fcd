use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::error::{PipelineError, ScoringError};
use super::scorer::Scorer;
use crate::constants::{DEFAULT_INPUT_CAPACITY, DEFAULT_OUTPUT_CAPACITY, DEFAULT_WORKER_COUNT};
use crate::domain::Event;

/// Queue sizes, pool size and per-event timeout for a [`ScoringPipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Capacity of the raw-event queue.
    pub input_capacity: usize,
    /// Capacity of the scored-event queue.
    pub output_capacity: usize,
    /// Number of scoring workers.
    pub workers: usize,
    /// Upper bound on a single scoring call. `None` waits indefinitely.
    pub score_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_capacity: DEFAULT_INPUT_CAPACITY,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
            workers: DEFAULT_WORKER_COUNT,
            score_timeout: None,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.input_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "input_capacity must be at least 1".to_string(),
            ));
        }
        if self.output_capacity == 0 {
            return Err(PipelineError::InvalidConfig(
                "output_capacity must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(PipelineError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a worker emits for each dequeued event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoredEvent {
    /// The event with its score attached.
    Scored(Event),
    /// Scoring failed; the event is forwarded unscored with the error.
    Failed { event: Event, error: ScoringError },
}

impl ScoredEvent {
    /// Returns the underlying event.
    pub fn event(&self) -> &Event {
        match self {
            ScoredEvent::Scored(event) | ScoredEvent::Failed { event, .. } => event,
        }
    }

    /// Returns `true` if scoring succeeded.
    pub fn is_scored(&self) -> bool {
        matches!(self, ScoredEvent::Scored(_))
    }
}

#[derive(Clone)]
/// Producer side of the pipeline. Cheap to clone.
pub struct PipelineHandle {
    input: mpsc::Sender<Event>,
}

impl PipelineHandle {
    /// Enqueues a raw event, waiting for capacity when the input queue is full.
    pub async fn submit(&self, event: Event) -> Result<(), PipelineError> {
        self.input
            .send(event)
            .await
            .map_err(|_| PipelineError::Closed)
    }

    /// Returns `true` once the input queue no longer accepts events.
    pub fn is_closed(&self) -> bool {
        self.input.is_closed()
    }

    /// Returns the free slots in the input queue.
    pub fn capacity(&self) -> usize {
        self.input.capacity()
    }
}

impl std::fmt::Debug for PipelineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("capacity", &self.input.capacity())
            .field("closed", &self.input.is_closed())
            .finish()
    }
}

/// Fixed-size pool of scoring workers.
///
/// Start-once: [`ScoringPipeline::start`] spawns the workers and
/// [`ScoringPipeline::shutdown`] consumes the pipeline.
pub struct ScoringPipeline {
    handle: PipelineHandle,
    input_closed: CancellationToken,
    workers: Vec<JoinHandle<()>>,
}

impl ScoringPipeline {
    /// Spawns `config.workers` workers and returns the pipeline plus the output queue.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: PipelineConfig,
        scorer: Arc<dyn Scorer>,
    ) -> Result<(Self, mpsc::Receiver<ScoredEvent>), PipelineError> {
        config.validate()?;

        let (input_tx, input_rx) = mpsc::channel::<Event>(config.input_capacity);
        let (output_tx, output_rx) = mpsc::channel::<ScoredEvent>(config.output_capacity);

        let input_rx = Arc::new(Mutex::new(input_rx));
        let input_closed = CancellationToken::new();

        info!(
            workers = config.workers,
            input_capacity = config.input_capacity,
            output_capacity = config.output_capacity,
            "starting scoring pool"
        );

        let workers = (0..config.workers)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&input_rx),
                    output_tx.clone(),
                    Arc::clone(&scorer),
                    input_closed.clone(),
                    config.score_timeout,
                ))
            })
            .collect();

        // Workers hold the only output senders from here on.
        drop(output_tx);

        let pipeline = Self {
            handle: PipelineHandle { input: input_tx },
            input_closed,
            workers,
        };

        Ok((pipeline, output_rx))
    }

    /// Returns a producer handle.
    pub fn handle(&self) -> PipelineHandle {
        self.handle.clone()
    }

    /// Returns the number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Closes the input queue and waits for every worker to exit.
    ///
    /// Producers must have stopped submitting. Buffered events are still scored; once the
    /// last worker returns, the output queue reports closed to its consumer.
    pub async fn shutdown(self) {
        info!(workers = self.workers.len(), "closing scoring pipeline input");
        self.input_closed.cancel();
        drop(self.handle);

        for worker in self.workers {
            if let Err(e) = worker.await {
                error!(error = %e, "scoring worker terminated abnormally");
            }
        }

        info!("scoring pool stopped");
    }
}

impl std::fmt::Debug for ScoringPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringPipeline")
            .field("workers", &self.workers.len())
            .field("input_closed", &self.input_closed.is_cancelled())
            .finish()
    }
}

async fn run_worker(
    worker_id: usize,
    input: Arc<Mutex<mpsc::Receiver<Event>>>,
    output: mpsc::Sender<ScoredEvent>,
    scorer: Arc<dyn Scorer>,
    input_closed: CancellationToken,
    score_timeout: Option<Duration>,
) {
    while let Some(event) = next_event(&input, &input_closed).await {
        let scored = score_event(scorer.as_ref(), event, score_timeout).await;

        if output.send(scored).await.is_err() {
            warn!(worker_id, "output queue dropped, scoring worker exiting");
            return;
        }
    }

    debug!(worker_id, "scoring worker stopped");
}

/// Dequeues the next event. Once `input_closed` fires the queue is closed and the
/// remaining buffered events are drained before `None` is returned.
async fn next_event(
    input: &Mutex<mpsc::Receiver<Event>>,
    input_closed: &CancellationToken,
) -> Option<Event> {
    let mut rx = input.lock().await;

    if input_closed.is_cancelled() {
        rx.close();
        return rx.recv().await;
    }

    tokio::select! {
        biased;
        event = rx.recv() => event,
        _ = input_closed.cancelled() => {
            rx.close();
            rx.recv().await
        }
    }
}

async fn score_event(
    scorer: &dyn Scorer,
    event: Event,
    score_timeout: Option<Duration>,
) -> ScoredEvent {
    let result = match score_timeout {
        Some(timeout) => {
            match tokio::time::timeout(timeout, scorer.score(event.raw_metric, &event.skill)).await
            {
                Ok(result) => result,
                Err(_) => Err(ScoringError::Timeout { timeout }),
            }
        }
        None => scorer.score(event.raw_metric, &event.skill).await,
    };

    match result {
        Ok(score) => {
            debug!(event_id = %event.id, talent_id = %event.talent_id, score, "event scored");
            ScoredEvent::Scored(event.with_score(score))
        }
        Err(error) => {
            warn!(event_id = %event.id, talent_id = %event.talent_id, error = %error, "scoring failed");
            ScoredEvent::Failed { event, error }
        }
    }
}
