//! Translation of engine progress records into user-facing events

use std::sync::Mutex;

use crate::engine::ProgressHook;
use crate::events::EventSender;
use crate::types::{ProgressStatus, ProgressUpdate, Stage};

/// Shown once the engine stops transferring; merge or transcode may still run
pub(crate) const POST_PROCESSING_MESSAGE: &str = "Download completed, processing video...";

/// Placeholder for speed or ETA the engine did not report
const NOT_AVAILABLE: &str = "N/A";

/// Progress hook for one orchestration call
///
/// Owns the call's [`Stage`] so transitions can be logged, and turns engine
/// records into `Progress` and `Status` events.
pub(crate) struct ProgressRelay {
    events: EventSender,
    stage: Mutex<Stage>,
}

impl ProgressRelay {
    pub(crate) fn new(events: EventSender) -> Self {
        Self {
            events,
            stage: Mutex::new(Stage::Idle),
        }
    }

    pub(crate) fn stage(&self) -> Stage {
        *self.stage.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move to `next`, ignoring moves out of a terminal stage
    pub(crate) fn enter(&self, next: Stage) {
        let mut stage = self.stage.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *stage == next || stage.is_terminal() {
            return;
        }
        tracing::debug!(from = ?*stage, to = ?next, "Download stage changed");
        *stage = next;
    }

    fn relay(&self, record: &serde_json::Value) -> crate::Result<()> {
        let update: ProgressUpdate = serde_json::from_value(record.clone())?;

        match update.status {
            ProgressStatus::Downloading => {
                // A playlist returns here from PostProcessing for every item
                self.enter(Stage::Downloading);
                if let Some(percent) = update.percent() {
                    self.events.progress(percent);
                    self.events.status(format!(
                        "Downloading... {}% | Speed: {} | ETA: {}",
                        percent,
                        or_not_available(update.speed_str.as_deref()),
                        or_not_available(update.eta_str.as_deref()),
                    ));
                }
            }
            ProgressStatus::Finished => {
                self.enter(Stage::PostProcessing);
                self.events.progress(100);
                self.events.status(POST_PROCESSING_MESSAGE);
            }
            ProgressStatus::Error | ProgressStatus::Other => {}
        }
        Ok(())
    }
}

impl ProgressHook for ProgressRelay {
    fn on_progress(&self, record: &serde_json::Value) {
        // Progress reporting must never abort the download
        if let Err(e) = self.relay(record) {
            tracing::debug!(error = %e, %record, "Ignoring malformed progress record");
        }
    }
}

fn or_not_available(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}
