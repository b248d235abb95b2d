//! Core types for vidfetch

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// What the user asked to download
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Best video and best audio merged into one container
    #[default]
    Video,
    /// Best audio transcoded to MP3
    Audio,
    /// Every item of a playlist, merged like [`DownloadMode::Video`]
    Playlist,
}

impl DownloadMode {
    /// Lowercase name, as used in logs and serialized configs
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadMode::Video => "video",
            DownloadMode::Audio => "audio",
            DownloadMode::Playlist => "playlist",
        }
    }
}

impl std::fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DownloadMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(DownloadMode::Video),
            "audio" | "mp3" => Ok(DownloadMode::Audio),
            "playlist" => Ok(DownloadMode::Playlist),
            other => Err(Error::InvalidRequest(format!(
                "unknown download mode '{other}' (expected video, audio or playlist)"
            ))),
        }
    }
}

/// A single user-initiated download
///
/// Built fresh for every action and moved into the worker on dispatch, so it
/// cannot change while a download is running.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    url: String,
    mode: DownloadMode,
    output_dir: PathBuf,
}

impl DownloadRequest {
    /// Create a request; surrounding whitespace in the URL is dropped
    pub fn new(url: impl Into<String>, mode: DownloadMode, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into().trim().to_string(),
            mode,
            output_dir: output_dir.into(),
        }
    }

    /// URL handed to the engine untouched
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requested mode
    pub fn mode(&self) -> DownloadMode {
        self.mode
    }

    /// Directory the engine writes into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Reject requests the engine should never see
    ///
    /// Only emptiness is checked. Deciding whether a URL is supported is the
    /// engine's job.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::InvalidRequest("URL must not be empty".into()));
        }
        Ok(())
    }
}

/// Lifecycle of one orchestration call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing started yet
    #[default]
    Idle,
    /// Engine resolving the URL
    Extracting,
    /// Bytes are flowing
    Downloading,
    /// Engine reported "finished"; merge or transcode may still be running
    PostProcessing,
    /// Engine returned successfully
    Completed,
    /// Engine returned an error
    Failed,
}

impl Stage {
    /// Whether the call has reached an end state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }
}

/// Event delivered to the presentation layer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Progress bar update
    Progress {
        /// Whole percent, 0 to 100
        percent: u8,
    },

    /// Line for the log window
    Status {
        /// Human-readable text
        message: String,
    },

    /// Download failed; shown to the user as-is
    Error {
        /// Free-text cause
        message: String,
    },

    /// Worker is done with the request
    Finished {
        /// Outcome of the orchestration call
        success: bool,
    },
}

impl Event {
    /// Shorthand for [`Event::Progress`]
    pub fn progress(percent: u8) -> Self {
        Event::Progress { percent }
    }

    /// Shorthand for [`Event::Status`]
    pub fn status(message: impl Into<String>) -> Self {
        Event::Status {
            message: message.into(),
        }
    }

    /// Shorthand for [`Event::Error`]
    pub fn error(message: impl Into<String>) -> Self {
        Event::Error {
            message: message.into(),
        }
    }

    /// Shorthand for [`Event::Finished`]
    pub fn finished(success: bool) -> Self {
        Event::Finished { success }
    }
}

/// Metadata the engine reports for a downloaded item
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Item title
    pub title: String,
    /// Engine-specific identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Final file extension
    #[serde(default)]
    pub ext: Option<String>,
    /// Final path after post-processing, when the engine knows it
    #[serde(default)]
    pub filepath: Option<PathBuf>,
    /// Title of the enclosing playlist
    #[serde(default)]
    pub playlist_title: Option<String>,
}

/// State reported by the engine's progress hook
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    /// Transfer in progress
    Downloading,
    /// Transfer done (post-processing may follow)
    Finished,
    /// Transfer failed
    Error,
    /// Any status this crate does not interpret
    #[serde(other)]
    Other,
}

/// One progress hook record, as the engine reports it
///
/// Field names follow the engine's own dictionary, so a raw record can be
/// deserialized directly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Engine state
    pub status: ProgressStatus,
    /// Bytes written so far
    #[serde(default)]
    pub downloaded_bytes: Option<u64>,
    /// Exact size, when known
    #[serde(default)]
    pub total_bytes: Option<u64>,
    /// Estimated size for fragmented streams
    #[serde(default)]
    pub total_bytes_estimate: Option<f64>,
    /// Pre-formatted speed ("1.50MiB/s")
    #[serde(default, rename = "_speed_str")]
    pub speed_str: Option<String>,
    /// Pre-formatted ETA ("00:05")
    #[serde(default, rename = "_eta_str")]
    pub eta_str: Option<String>,
    /// File being written
    #[serde(default)]
    pub filename: Option<String>,
}

impl ProgressUpdate {
    /// A bare record with only a status
    pub fn new(status: ProgressStatus) -> Self {
        Self {
            status,
            downloaded_bytes: None,
            total_bytes: None,
            total_bytes_estimate: None,
            speed_str: None,
            eta_str: None,
            filename: None,
        }
    }

    /// A `downloading` record with byte counts
    pub fn downloading(downloaded: u64, total: u64) -> Self {
        Self {
            downloaded_bytes: Some(downloaded),
            total_bytes: Some(total),
            ..Self::new(ProgressStatus::Downloading)
        }
    }

    /// Size to compute a percentage against
    ///
    /// The exact size wins. The estimate is only used when the engine sent no
    /// exact size at all, so an explicit `total_bytes: 0` still yields nothing.
    pub fn total(&self) -> Option<u64> {
        match self.total_bytes {
            Some(total) => Some(total),
            None => self
                .total_bytes_estimate
                .filter(|estimate| estimate.is_finite() && *estimate >= 1.0)
                .map(|estimate| estimate as u64),
        }
    }

    /// Whole percent downloaded, truncated and capped at 100
    ///
    /// `None` when either byte count is missing or the total is zero.
    pub fn percent(&self) -> Option<u8> {
        let downloaded = self.downloaded_bytes?;
        let total = self.total().filter(|total| *total > 0)?;
        let percent = (u128::from(downloaded) * 100 / u128::from(total)).min(100);
        Some(percent as u8)
    }
}
