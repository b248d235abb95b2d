//! Engine used when no yt-dlp binary is available

use async_trait::async_trait;

use super::options::EngineOptions;
use super::traits::{Engine, ProgressHook};
use crate::types::MediaInfo;

const MISSING_BINARY: &str = "downloading requires the yt-dlp binary. \
     Configure ytdlp_path in config or ensure yt-dlp is in PATH.";

/// Stand-in engine that fails every call with `Error::NotSupported`
///
/// Lets a front-end start without yt-dlp installed: each download attempt then
/// fails through the ordinary error path and the user sees why in the log.
///
/// ```
/// use vidfetch::engine::{Engine, EngineOptions, EngineSettings, UnavailableEngine};
/// use vidfetch::DownloadMode;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() {
/// let options = EngineOptions::for_mode(DownloadMode::Video, Path::new("out"), &EngineSettings::default());
/// let hook = |_: &serde_json::Value| {};
/// let result = UnavailableEngine.extract_info(&options, "https://example.com/v", &hook).await;
/// assert!(result.is_err());
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEngine;

#[async_trait]
impl Engine for UnavailableEngine {
    async fn extract_info(
        &self,
        _options: &EngineOptions,
        _url: &str,
        _hook: &dyn ProgressHook,
    ) -> crate::Result<MediaInfo> {
        Err(crate::Error::NotSupported(MISSING_BINARY.into()))
    }

    async fn download(
        &self,
        _options: &EngineOptions,
        _urls: &[String],
        _hook: &dyn ProgressHook,
    ) -> crate::Result<()> {
        Err(crate::Error::NotSupported(MISSING_BINARY.into()))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
