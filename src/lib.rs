//! # vidfetch
//!
//! Download orchestration for video and audio front-ends built on yt-dlp.
//!
//! ## Design Philosophy
//!
//! vidfetch is designed to be:
//! - **Thin** - URL resolution, stream selection, merging and transcoding all
//!   stay in the engine; this crate picks options and reports what happens
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Event-driven** - Consumers read an event stream, no polling required
//! - **One at a time** - A worker runs a single download and rejects the rest
//!
//! ## Quick Start
//!
//! ```no_run
//! use vidfetch::{Config, DownloadMode, DownloadRequest, DownloadWorker, Event, event_channel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let worker = DownloadWorker::from_config(&config)?;
//!
//!     let (events_tx, mut events) = event_channel();
//!     let request = DownloadRequest::new(
//!         "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!         DownloadMode::Audio,
//!         &config.download_dir,
//!     );
//!     worker.dispatch(request, events_tx)?;
//!
//!     while let Some(event) = events.recv().await {
//!         println!("Event: {:?}", event);
//!         if matches!(event, Event::Finished { .. }) {
//!             break;
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Download orchestration and single-slot dispatch
pub mod downloader;
/// Download engine seam and the yt-dlp implementation
pub mod engine;
/// Error types
pub mod error;
/// Event channel between downloads and their consumer
pub mod events;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, ToolsConfig};
pub use downloader::{DownloadWorker, Downloader, ensure_output_directory};
pub use engine::{Engine, EngineOptions, EngineSettings, ProgressHook, UnavailableEngine, YtDlpCli};
pub use error::{Error, Result};
pub use events::{EventSender, EventStream, event_channel};
pub use types::{
    DownloadMode, DownloadRequest, Event, MediaInfo, ProgressStatus, ProgressUpdate, Stage,
};
