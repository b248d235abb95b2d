//! Basic download example
//!
//! This example demonstrates the core functionality of vidfetch:
//! - Loading configuration (or using defaults)
//! - Creating a worker that finds yt-dlp on its own
//! - Dispatching a request in the background
//! - Consuming the event stream until the download finishes
//!
//! Usage: `cargo run --example basic_download -- <url> [video|audio|playlist]`

use vidfetch::{Config, DownloadMode, DownloadRequest, DownloadWorker, Event, event_channel};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .unwrap_or_else(|| "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string());
    let mode: DownloadMode = match args.next() {
        Some(mode) => mode.parse()?,
        None => DownloadMode::Video,
    };

    // Use vidfetch.json when present, defaults otherwise
    let config = match Config::from_json_file("vidfetch.json") {
        Ok(config) => config,
        Err(vidfetch::Error::Io(_)) => Config::default(),
        Err(e) => return Err(e.into()),
    };

    let worker = DownloadWorker::from_config(&config)?;
    let (events_tx, mut events) = event_channel();

    let request = DownloadRequest::new(url, mode, &config.download_dir);
    let handle = worker.dispatch(request, events_tx)?;

    // The front-end owns presentation; here that is just the terminal
    while let Some(event) = events.recv().await {
        match event {
            Event::Progress { percent } => println!("[{:>3}%]", percent),
            Event::Status { message } => println!("{}", message),
            Event::Error { message } => eprintln!("✗ {}", message),
            Event::Finished { success } => {
                println!("Finished (success: {})", success);
                break;
            }
        }
    }

    if !handle.await? {
        std::process::exit(1);
    }

    Ok(())
}
