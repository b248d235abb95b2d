//! Download engine abstraction
//!
//! The orchestrator never talks to yt-dlp directly. It builds an
//! [`EngineOptions`] record per mode and hands it to an [`Engine`]:
//!
//! - [`YtDlpCli`]: runs the external `yt-dlp` executable
//! - [`UnavailableEngine`]: stand-in when no binary can be found
//!
//! Tests substitute their own fakes, which only need to call the
//! [`ProgressHook`] with engine-shaped records and return a result.

mod cli;
mod options;
mod parser;
mod template;
mod traits;
mod unavailable;

pub use cli::YtDlpCli;
pub use options::{
    AUDIO_BITRATE_KBPS, AUDIO_CODEC, AUDIO_FORMAT, EngineOptions, EngineSettings, ITEM_TEMPLATE,
    PLAYLIST_DIR_TEMPLATE, Postprocessor, VIDEO_FORMAT,
};
pub use parser::{OutputLine, engine_error_message, parse_output_line};
pub use template::{NA_PLACEHOLDER, render_output_template};
pub use traits::{Engine, ProgressHook};
pub use unavailable::UnavailableEngine;
