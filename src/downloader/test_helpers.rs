//! Shared test helpers: a scripted engine that needs no external binary.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::engine::{Engine, EngineOptions, ProgressHook};
use crate::error::{Error, Result};
use crate::types::MediaInfo;

/// One recorded engine invocation
#[derive(Clone, Debug)]
pub(crate) struct EngineCall {
    pub(crate) method: &'static str,
    pub(crate) options: EngineOptions,
    pub(crate) urls: Vec<String>,
}

/// Engine that replays scripted progress records, then succeeds or fails
pub(crate) struct FakeEngine {
    records: Vec<Value>,
    title: String,
    failure: Option<String>,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<EngineCall>>,
}

impl FakeEngine {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
            title: "Test Video".to_string(),
            failure: None,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records;
        self
    }

    pub(crate) fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub(crate) fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Hold every call until the gate is notified
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn run(
        &self,
        method: &'static str,
        options: &EngineOptions,
        urls: &[String],
        hook: &dyn ProgressHook,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(EngineCall {
            method,
            options: options.clone(),
            urls: urls.to_vec(),
        });

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        for record in &self.records {
            hook.on_progress(record);
        }

        match &self.failure {
            Some(message) => Err(Error::Engine(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn extract_info(
        &self,
        options: &EngineOptions,
        url: &str,
        hook: &dyn ProgressHook,
    ) -> Result<MediaInfo> {
        self.run("extract_info", options, &[url.to_string()], hook)
            .await?;
        Ok(MediaInfo {
            title: self.title.clone(),
            id: Some("abc123".to_string()),
            ext: Some("mp4".to_string()),
            filepath: None,
            playlist_title: None,
        })
    }

    async fn download(
        &self,
        options: &EngineOptions,
        urls: &[String],
        hook: &dyn ProgressHook,
    ) -> Result<()> {
        self.run("download", options, urls, hook).await
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Progress record as yt-dlp reports a transfer in flight
pub(crate) fn downloading(downloaded: u64, total: u64) -> Value {
    json!({
        "status": "downloading",
        "downloaded_bytes": downloaded,
        "total_bytes": total,
        "_speed_str": "1.00MiB/s",
        "_eta_str": "00:10"
    })
}

/// Progress record as yt-dlp reports a finished transfer
pub(crate) fn finished() -> Value {
    json!({"status": "finished", "filename": "Test Video.f137.mp4"})
}
