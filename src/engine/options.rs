//! Option records handed to the engine, one shape per download mode

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::DownloadMode;

/// Stream selection for merged video downloads
pub const VIDEO_FORMAT: &str = "bestvideo+bestaudio/best";

/// Stream selection for audio-only downloads
pub const AUDIO_FORMAT: &str = "bestaudio/best";

/// Target codec for audio downloads
pub const AUDIO_CODEC: &str = "mp3";

/// Target bitrate for audio downloads, in kbps
pub const AUDIO_BITRATE_KBPS: u32 = 192;

/// Per-item file name template
pub const ITEM_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Directory template grouping playlist items
pub const PLAYLIST_DIR_TEMPLATE: &str = "%(playlist_title)s";

/// Transform applied after the raw streams are downloaded
///
/// Serializes to the engine's own descriptor shape, e.g.
/// `{"key": "FFmpegExtractAudio", "preferredcodec": "mp3", "preferredquality": "192"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key")]
pub enum Postprocessor {
    /// Merge separate video and audio streams into one container
    #[serde(rename = "FFmpegMerger")]
    Merger,

    /// Transcode the audio stream
    #[serde(rename = "FFmpegExtractAudio")]
    ExtractAudio {
        /// Target codec ("mp3")
        #[serde(rename = "preferredcodec")]
        codec: String,
        /// Target quality; values above 10 are a bitrate in kbps
        #[serde(rename = "preferredquality")]
        quality: String,
    },
}

/// Knobs that apply to every mode, usually taken from [`Config`](crate::Config)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Suppress the engine's regular output
    #[serde(default)]
    pub quiet: bool,
    /// Suppress the engine's warnings
    #[serde(default)]
    pub no_warnings: bool,
    /// Container for merged downloads (engine default when `None`)
    #[serde(default)]
    pub merge_output_format: Option<String>,
}

/// Configuration record for one engine invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Stream-selection expression
    pub format: String,
    /// Ordered post-download transforms
    pub postprocessors: Vec<Postprocessor>,
    /// Output path template
    pub outtmpl: String,
    /// Suppress regular output
    pub quiet: bool,
    /// Suppress warnings
    pub no_warnings: bool,
    /// Container for merged downloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_output_format: Option<String>,
}

impl EngineOptions {
    /// Options for `mode`, writing below `output_dir`
    pub fn for_mode(mode: DownloadMode, output_dir: &Path, settings: &EngineSettings) -> Self {
        let (format, postprocessors, outtmpl) = match mode {
            DownloadMode::Video => (
                VIDEO_FORMAT,
                vec![Postprocessor::Merger],
                output_dir.join(ITEM_TEMPLATE),
            ),
            DownloadMode::Audio => (
                AUDIO_FORMAT,
                vec![Postprocessor::ExtractAudio {
                    codec: AUDIO_CODEC.to_string(),
                    quality: AUDIO_BITRATE_KBPS.to_string(),
                }],
                output_dir.join(ITEM_TEMPLATE),
            ),
            DownloadMode::Playlist => (
                VIDEO_FORMAT,
                vec![Postprocessor::Merger],
                output_dir.join(PLAYLIST_DIR_TEMPLATE).join(ITEM_TEMPLATE),
            ),
        };

        // Only merged outputs have a container to choose
        let merge_output_format = match mode {
            DownloadMode::Audio => None,
            DownloadMode::Video | DownloadMode::Playlist => settings.merge_output_format.clone(),
        };

        Self {
            format: format.to_string(),
            postprocessors,
            outtmpl: outtmpl.to_string_lossy().into_owned(),
            quiet: settings.quiet,
            no_warnings: settings.no_warnings,
            merge_output_format,
        }
    }

    /// Whether any postprocessor transcodes audio
    pub fn extracts_audio(&self) -> bool {
        self.postprocessors
            .iter()
            .any(|pp| matches!(pp, Postprocessor::ExtractAudio { .. }))
    }
}
