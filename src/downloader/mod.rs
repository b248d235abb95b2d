//! Download orchestration
//!
//! [`Downloader`] runs one request in one of three modes against an [`Engine`],
//! translating everything the engine reports into [`Event`](crate::Event)s.
//! [`DownloadWorker`] adds the one-download-at-a-time dispatch a front-end needs.

mod progress;
mod worker;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use worker::DownloadWorker;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::{Engine, EngineOptions, EngineSettings};
use crate::error::{Error, Result};
use crate::events::EventSender;
use crate::types::{DownloadMode, Stage};
use progress::ProgressRelay;

/// Orchestrator bound to one output directory
///
/// Each call to [`Downloader::download`] is independent: no state survives
/// between calls apart from the directory, which is created up front.
pub struct Downloader {
    engine: Arc<dyn Engine>,
    output_dir: PathBuf,
    settings: EngineSettings,
}

impl Downloader {
    /// Create a downloader writing below `output_dir`
    ///
    /// The directory is created (with parents) if missing.
    ///
    /// # Errors
    ///
    /// `Error::Filesystem` if the directory cannot be created or written.
    pub async fn new(engine: Arc<dyn Engine>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        ensure_output_directory(&output_dir).await?;

        tracing::debug!(
            engine = engine.name(),
            output_dir = %output_dir.display(),
            "Downloader ready"
        );

        Ok(Self {
            engine,
            output_dir,
            settings: EngineSettings::default(),
        })
    }

    /// Replace the mode-independent engine knobs
    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Directory downloads are written below
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Engine options this downloader uses for `mode`
    pub fn options_for(&self, mode: DownloadMode) -> EngineOptions {
        EngineOptions::for_mode(mode, &self.output_dir, &self.settings)
    }

    /// Run `url` in `mode`, reporting through `events`
    ///
    /// Returns true only if the engine reported success. A failure emits
    /// exactly one `Error` event; `Finished` is left to the caller.
    pub async fn download(&self, url: &str, mode: DownloadMode, events: &EventSender) -> bool {
        match mode {
            DownloadMode::Video => self.download_video(url, events).await,
            DownloadMode::Audio => self.download_audio(url, events).await,
            DownloadMode::Playlist => self.download_playlist(url, events).await,
        }
    }

    /// Best video merged with best audio
    pub async fn download_video(&self, url: &str, events: &EventSender) -> bool {
        self.download_single(
            url,
            DownloadMode::Video,
            events,
            "Extracting video information...",
            "Successfully downloaded",
            "Failed to download video",
        )
        .await
    }

    /// Best audio transcoded to MP3
    pub async fn download_audio(&self, url: &str, events: &EventSender) -> bool {
        self.download_single(
            url,
            DownloadMode::Audio,
            events,
            "Extracting audio information...",
            "Successfully downloaded audio",
            "Failed to download audio",
        )
        .await
    }

    /// Every item of a playlist, under a directory named after the playlist
    pub async fn download_playlist(&self, url: &str, events: &EventSender) -> bool {
        let options = self.options_for(DownloadMode::Playlist);
        let relay = ProgressRelay::new(events.clone());

        tracing::info!(url, mode = "playlist", "Starting download");
        relay.enter(Stage::Extracting);
        events.status("Starting playlist download...");

        let urls = [url.to_string()];
        match self.engine.download(&options, &urls, &relay).await {
            Ok(()) => {
                relay.enter(Stage::Completed);
                tracing::info!(url, mode = "playlist", "Download completed");
                events.status("✓ Playlist download completed");
                events.progress(100);
                true
            }
            Err(e) => fail(&relay, events, url, DownloadMode::Playlist, "Failed to download playlist", &e),
        }
    }

    async fn download_single(
        &self,
        url: &str,
        mode: DownloadMode,
        events: &EventSender,
        extracting: &str,
        done: &str,
        failed: &str,
    ) -> bool {
        let options = self.options_for(mode);
        let relay = ProgressRelay::new(events.clone());

        tracing::info!(url, mode = mode.as_str(), "Starting download");
        relay.enter(Stage::Extracting);
        events.status(extracting);

        match self.engine.extract_info(&options, url, &relay).await {
            Ok(info) => {
                let path = self.engine.prepare_filename(&options, &info);
                relay.enter(Stage::Completed);
                tracing::info!(
                    url,
                    mode = mode.as_str(),
                    title = %info.title,
                    path = %path.display(),
                    "Download completed"
                );
                events.status(format!("✓ {}: {}", done, info.title));
                events.progress(100);
                true
            }
            Err(e) => fail(&relay, events, url, mode, failed, &e),
        }
    }
}

fn fail(
    relay: &ProgressRelay,
    events: &EventSender,
    url: &str,
    mode: DownloadMode,
    prefix: &str,
    error: &Error,
) -> bool {
    let stage = relay.stage();
    relay.enter(Stage::Failed);
    tracing::warn!(
        url,
        mode = mode.as_str(),
        ?stage,
        error = %error,
        code = error.error_code(),
        "Download failed"
    );
    events.error(format!("{}: {}", prefix, error));
    false
}

/// Create `path` and its parents if missing
///
/// Idempotent. Fails if the path cannot be created (a regular file is in the
/// way, or a parent is unwritable) or the current user cannot create files in
/// it. Writability is tested by creating and removing a scratch file.
///
/// # Errors
///
/// `Error::Filesystem` carrying the path and the underlying I/O error.
pub async fn ensure_output_directory(path: &Path) -> Result<()> {
    let filesystem = |source: std::io::Error| Error::Filesystem {
        path: path.to_path_buf(),
        source,
    };

    tokio::fs::create_dir_all(path).await.map_err(filesystem)?;
    check_writable(path).await.map_err(filesystem)?;

    tracing::trace!(path = %path.display(), "Output directory ready");
    Ok(())
}

async fn check_writable(dir: &Path) -> std::io::Result<()> {
    static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

    let scratch = dir.join(format!(
        ".vidfetch-write-check-{}-{}",
        std::process::id(),
        SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&scratch)
        .await?;
    drop(file);

    if let Err(e) = tokio::fs::remove_file(&scratch).await {
        tracing::debug!(path = %scratch.display(), error = %e, "Could not remove write check file");
    }
    Ok(())
}
