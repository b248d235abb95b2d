//! Single-slot dispatch of download requests onto background tasks

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::Downloader;
use crate::config::Config;
use crate::engine::{Engine, EngineSettings};
use crate::error::{Error, Result};
use crate::events::EventSender;
use crate::types::DownloadRequest;

/// Runs at most one download at a time, each on its own tokio task
///
/// The slot is a one-permit semaphore, so a dispatch that races another sees
/// [`Error::Busy`] instead of starting a second download.
#[derive(Clone)]
pub struct DownloadWorker {
    engine: Arc<dyn Engine>,
    settings: EngineSettings,
    slot: Arc<Semaphore>,
}

impl DownloadWorker {
    /// Create a worker driving `engine` with default settings
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine,
            settings: EngineSettings::default(),
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    /// Replace the mode-independent engine knobs
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build a worker from validated configuration
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration does not validate.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.engine()).with_settings(config.engine_settings()))
    }

    /// Whether a download is in flight
    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }

    /// Start `request` in the background
    ///
    /// The returned handle resolves to the download's success flag. The task
    /// always emits `Finished` as its last event, after releasing the slot, so
    /// a consumer reacting to `Finished` can dispatch again immediately.
    ///
    /// # Errors
    ///
    /// `Error::InvalidRequest` for an empty URL, `Error::Busy` while another
    /// download is running. Nothing is emitted in either case.
    pub fn dispatch(&self, request: DownloadRequest, events: EventSender) -> Result<JoinHandle<bool>> {
        request.validate()?;

        let permit = Arc::clone(&self.slot)
            .try_acquire_owned()
            .map_err(|_| Error::Busy)?;

        let engine = Arc::clone(&self.engine);
        let settings = self.settings.clone();

        tracing::info!(
            url = request.url(),
            mode = request.mode().as_str(),
            output_dir = %request.output_dir().display(),
            "Download dispatched"
        );

        Ok(tokio::spawn(async move {
            events.status(format!("Starting download from: {}", request.url()));

            let success = match Downloader::new(engine, request.output_dir()).await {
                Ok(downloader) => {
                    downloader
                        .with_settings(settings)
                        .download(request.url(), request.mode(), &events)
                        .await
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not prepare output directory");
                    events.error(e.to_string());
                    false
                }
            };

            drop(permit);
            events.finished(success);
            success
        }))
    }
}
