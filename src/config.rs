//! Configuration types for vidfetch

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{Engine, EngineSettings, UnavailableEngine, YtDlpCli};
use crate::error::{Error, Result};

/// Containers yt-dlp can merge into
const MERGE_CONTAINERS: &[&str] = &["avi", "flv", "mkv", "mov", "mp4", "webm"];

/// External tool paths
///
/// Used as a flattened sub-config within [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Path to yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Path to ffmpeg binary or its directory (yt-dlp's own lookup if None)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Container for merged video downloads (yt-dlp's choice if None)
    #[serde(default)]
    pub merge_output_format: Option<String>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_path: None,
            merge_output_format: None,
            search_path: true,
        }
    }
}

/// Main configuration
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where downloads go unless a request says otherwise (default: "downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Pass the engine's quiet flag
    #[serde(default)]
    pub quiet: bool,

    /// Pass the engine's no-warnings flag
    #[serde(default)]
    pub no_warnings: bool,

    /// External tool paths
    #[serde(flatten)]
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            quiet: false,
            no_warnings: false,
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Load a JSON config file
    ///
    /// # Errors
    ///
    /// `Error::Io` if the file cannot be read, `Error::Serialization` if it is
    /// not valid JSON, `Error::Config` if a value is out of range.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if let Some(container) = &self.tools.merge_output_format
            && !MERGE_CONTAINERS.contains(&container.as_str())
        {
            return Err(Error::Config {
                message: format!(
                    "unsupported merge container '{}' (expected one of: {})",
                    container,
                    MERGE_CONTAINERS.join(", ")
                ),
                key: Some("merge_output_format".into()),
            });
        }

        if self.download_dir.as_os_str().is_empty() {
            return Err(Error::Config {
                message: "download directory must not be empty".into(),
                key: Some("download_dir".into()),
            });
        }

        Ok(())
    }

    /// Mode-independent engine knobs
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            quiet: self.quiet,
            no_warnings: self.no_warnings,
            merge_output_format: self.tools.merge_output_format.clone(),
        }
    }

    /// Resolve the engine to use
    ///
    /// An explicit `ytdlp_path` wins; otherwise PATH is searched when allowed.
    /// Without a binary the [`UnavailableEngine`] is returned, so every download
    /// fails with a readable message instead of the front-end refusing to start.
    pub fn engine(&self) -> Arc<dyn Engine> {
        let cli = if let Some(ref ytdlp_path) = self.tools.ytdlp_path {
            Some(YtDlpCli::new(ytdlp_path.clone()))
        } else if self.tools.search_path {
            YtDlpCli::from_path()
        } else {
            None
        };

        let engine: Arc<dyn Engine> = match cli {
            Some(cli) => match &self.tools.ffmpeg_path {
                Some(ffmpeg) => Arc::new(cli.with_ffmpeg_location(ffmpeg.clone())),
                None => Arc::new(cli),
            },
            None => Arc::new(UnavailableEngine),
        };

        tracing::info!(engine = engine.name(), "Download engine initialized");
        engine
    }
}

// Default value functions
fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_true() -> bool {
    true
}
