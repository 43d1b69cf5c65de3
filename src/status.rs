use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Progress of one pipeline run, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StatusEvent {
    Started,
    Downloading,
    Converting,
    Completed(PathBuf),
    Failed(String),
}

impl StatusEvent {
    /// Completed and Failed end a run; nothing follows them
    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusEvent::Completed(_) | StatusEvent::Failed(_))
    }
}
