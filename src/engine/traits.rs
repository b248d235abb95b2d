//! Traits at the seam between the orchestrator and the download engine

use async_trait::async_trait;
use std::path::PathBuf;

use super::options::EngineOptions;
use super::template::render_output_template;
use crate::types::MediaInfo;

/// Receiver for the engine's progress records
///
/// Records are passed exactly as the engine produced them. Interpreting them is
/// the receiver's business, and a malformed record must never abort a download,
/// so the hook has no way to return an error.
pub trait ProgressHook: Send + Sync {
    /// Called on every engine state change, in order
    fn on_progress(&self, record: &serde_json::Value);
}

impl<F> ProgressHook for F
where
    F: Fn(&serde_json::Value) + Send + Sync,
{
    fn on_progress(&self, record: &serde_json::Value) {
        self(record)
    }
}

/// External extraction/download engine
///
/// Everything hard (URL resolution, stream selection, transfer, merging,
/// transcoding, playlist traversal) happens behind this trait. Implementations
/// can drive an external binary, or be fakes for tests.
///
/// # Examples
///
/// ```no_run
/// use vidfetch::engine::{Engine, EngineOptions, EngineSettings, YtDlpCli};
/// use vidfetch::DownloadMode;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = YtDlpCli::from_path().expect("yt-dlp not found in PATH");
/// let options = EngineOptions::for_mode(
///     DownloadMode::Audio,
///     Path::new("downloads"),
///     &EngineSettings::default(),
/// );
///
/// let hook = |record: &serde_json::Value| println!("{record}");
/// let info = engine
///     .extract_info(&options, "https://example.com/watch?v=abc", &hook)
///     .await?;
/// println!("saved {}", engine.prepare_filename(&options, &info).display());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Engine: Send + Sync {
    /// Resolve `url`, download it and report what was written
    ///
    /// # Errors
    ///
    /// Any failure the engine reports (network, unavailable format, disk,
    /// post-processing) and failures to run the engine at all.
    async fn extract_info(
        &self,
        options: &EngineOptions,
        url: &str,
        hook: &dyn ProgressHook,
    ) -> crate::Result<MediaInfo>;

    /// Download every URL, enumerating playlists
    ///
    /// # Errors
    ///
    /// Same as [`Engine::extract_info`].
    async fn download(
        &self,
        options: &EngineOptions,
        urls: &[String],
        hook: &dyn ProgressHook,
    ) -> crate::Result<()>;

    /// Path the engine wrote (or would write) `info` to
    fn prepare_filename(&self, options: &EngineOptions, info: &MediaInfo) -> PathBuf {
        match &info.filepath {
            Some(path) => path.clone(),
            None => render_output_template(&options.outtmpl, info),
        }
    }

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
