//! Event collection and assertions for integration tests

use std::time::Duration;
use vidfetch::{Event, EventStream};

/// Default time budget for a scripted download
pub const EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Collect events up to and including `Finished`
///
/// Panics if `Finished` does not arrive within `timeout` or the channel
/// closes first.
pub async fn collect_until_finished(events: &mut EventStream, timeout: Duration) -> Vec<Event> {
    let collected = tokio::time::timeout(timeout, async {
        let mut collected = Vec::new();
        loop {
            match events.recv().await {
                Some(event @ Event::Finished { .. }) => {
                    collected.push(event);
                    return collected;
                }
                Some(event) => collected.push(event),
                None => panic!("event channel closed before Finished: {collected:?}"),
            }
        }
    })
    .await;

    collected.unwrap_or_else(|_| panic!("timed out after {timeout:?} waiting for Finished"))
}

/// Only the `Progress` percentages, in order
pub fn progress_values(events: &[Event]) -> Vec<u8> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Progress { percent } => Some(*percent),
            _ => None,
        })
        .collect()
}

/// Only the `Error` messages, in order
pub fn error_messages(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Error { message } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

/// Assert the stream ended with `Finished(expected)` and nothing after it
pub fn assert_finished(events: &[Event], expected: bool) {
    assert_eq!(
        events.last(),
        Some(&Event::finished(expected)),
        "expected Finished({expected}) last, got {events:?}"
    );
    let finished_count = events
        .iter()
        .filter(|event| matches!(event, Event::Finished { .. }))
        .count();
    assert_eq!(finished_count, 1, "Finished must be emitted exactly once");
}
