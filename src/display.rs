use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::jobs::JobEvent;
use crate::status::StatusEvent;

pub const IDLE_TEXT: &str = "Enter a URL and select format";
pub const COMPLETE_TEXT: &str = "Download complete! Check your folder.";

/// Front-end state for one status line. Only `apply` changes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDisplay {
    label: String,
    busy: bool,
    succeeded: Option<bool>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            label: IDLE_TEXT.to_string(),
            busy: false,
            succeeded: None,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &JobEvent) {
        self.label = label_for(&event.status);
        self.busy = !event.status.is_terminal();
        self.succeeded = match &event.status {
            StatusEvent::Completed(_) => Some(true),
            StatusEvent::Failed(_) => Some(false),
            _ => None,
        };
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// While busy the front end must not accept another submission
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn succeeded(&self) -> Option<bool> {
        self.succeeded
    }
}

pub fn label_for(status: &StatusEvent) -> String {
    match status {
        StatusEvent::Started => "Starting...".to_string(),
        StatusEvent::Downloading => "Downloading...".to_string(),
        StatusEvent::Converting => "Converting...".to_string(),
        StatusEvent::Completed(_) => COMPLETE_TEXT.to_string(),
        StatusEvent::Failed(message) => message.clone(),
    }
}

/// Terminal rendering of a `StatusDisplay`
pub struct Spinner {
    bar: ProgressBar,
    state: StatusDisplay,
}

impl Spinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        let template = "{spinner:.green} [{elapsed_precise}] {msg}";
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message(IDLE_TEXT);

        Self {
            bar,
            state: StatusDisplay::new(),
        }
    }

    pub fn apply(&mut self, event: &JobEvent) {
        self.state.apply(event);
        match &event.status {
            StatusEvent::Completed(path) => {
                let message = format!("{} ({})", self.state.label(), path.display());
                self.bar.finish_with_message(message);
            }
            StatusEvent::Failed(_) => {
                self.bar.abandon_with_message(self.state.label().to_string());
            }
            _ => self.bar.set_message(self.state.label().to_string()),
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}
