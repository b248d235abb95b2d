use super::*;

use crate::events::{EventStream, event_channel};
use crate::types::Event;
use super::test_helpers::{FakeEngine, downloading, finished};
use tempfile::TempDir;


async fn downloader_with(engine: Arc<FakeEngine>) -> (Downloader, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Downloader::new(engine, temp_dir.path().join("downloads"))
        .await
        .unwrap();
    (downloader, temp_dir)
}

fn error_messages(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Error { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// Collect events until the sender side finishes
async fn collect_finished(rx: &mut EventStream) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let done = matches!(event, Event::Finished { .. });
        events.push(event);
        if done {
            break;
        }
    }
    events
}
