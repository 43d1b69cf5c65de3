use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::error::{GrabError, Result};
use crate::pipeline::Pipeline;
use crate::request::Request;
use crate::status::StatusEvent;

/// A status event tagged with the job it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct JobEvent {
    pub job_id: Uuid,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub status: StatusEvent,
}

/// A pipeline run executing on a worker task
pub struct JobHandle {
    id: Uuid,
    events: mpsc::UnboundedReceiver<JobEvent>,
    task: JoinHandle<Result<PathBuf>>,
}

impl JobHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next event, or `None` once the run has ended and every event was delivered
    pub async fn next_event(&mut self) -> Option<JobEvent> {
        self.events.recv().await
    }

    /// Wait for the run to finish. Events not yet received are dropped.
    pub async fn wait(self) -> Result<PathBuf> {
        self.task
            .await
            .map_err(|e| GrabError::Io(std::io::Error::other(format!("job task failed: {}", e))))?
    }
}

/// Dispatches requests onto tokio worker tasks so the caller's own loop is
/// never blocked by a run
#[derive(Clone)]
pub struct JobRunner {
    pipeline: Arc<Pipeline>,
}

impl JobRunner {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn spawn(&self, request: Request) -> JobHandle {
        let id = Uuid::new_v4();
        let (tx, events) = mpsc::unbounded_channel();
        let pipeline = Arc::clone(&self.pipeline);
        let span = tracing::info_span!("job", %id);

        let task = tokio::spawn(
            async move {
                debug!("Job started for {}", request.locator());
                let mut forward = move |status: StatusEvent| {
                    // A dropped receiver only means nobody is watching anymore
                    let _ = tx.send(JobEvent { job_id: id, at: Utc::now(), status });
                };
                pipeline.run(&request, &mut forward).await
            }
            .instrument(span),
        );

        JobHandle { id, events, task }
    }
}
