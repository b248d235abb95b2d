//! Engine fixtures: an in-process scripted engine and a fake yt-dlp executable

use async_trait::async_trait;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use vidfetch::{Engine, EngineOptions, Error, MediaInfo, ProgressHook, Result};

/// Title every fixture reports for the downloaded item
pub const FIXTURE_TITLE: &str = "Fixture Clip";

/// Progress record shaped like yt-dlp's progress dictionary
pub fn downloading_record(downloaded: u64, total: u64) -> Value {
    json!({
        "status": "downloading",
        "downloaded_bytes": downloaded,
        "total_bytes": total,
        "_speed_str": "2.50MiB/s",
        "_eta_str": "00:05"
    })
}

/// Final record for one transferred file
pub fn finished_record() -> Value {
    json!({"status": "finished", "total_bytes": 100})
}

/// In-process engine replaying fixed records through the public [`Engine`] trait
pub struct ScriptedEngine {
    records: Vec<Value>,
    failure: Option<String>,
    seen: Mutex<Vec<EngineOptions>>,
}

impl ScriptedEngine {
    /// Engine that reports `records` and then succeeds
    pub fn succeeding(records: Vec<Value>) -> Self {
        Self {
            records,
            failure: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Engine that reports `records` and then fails with `message`
    pub fn failing(records: Vec<Value>, message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::succeeding(records)
        }
    }

    /// Options of every call so far
    pub fn seen_options(&self) -> Vec<EngineOptions> {
        self.seen.lock().unwrap().clone()
    }

    fn replay(&self, options: &EngineOptions, hook: &dyn ProgressHook) -> Result<()> {
        self.seen.lock().unwrap().push(options.clone());
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
impl Engine for ScriptedEngine {
    async fn extract_info(
        &self,
        options: &EngineOptions,
        _url: &str,
        hook: &dyn ProgressHook,
    ) -> Result<MediaInfo> {
        self.replay(options, hook)?;
        Ok(MediaInfo {
            title: FIXTURE_TITLE.to_string(),
            ext: Some("mp4".to_string()),
            ..Default::default()
        })
    }

    async fn download(
        &self,
        options: &EngineOptions,
        _urls: &[String],
        hook: &dyn ProgressHook,
    ) -> Result<()> {
        self.replay(options, hook)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// How the fake yt-dlp executable behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeYtDlp {
    /// Reports 25%, 75%, finished, then the media info line
    Succeeds,
    /// Reports some progress, prints an ERROR line and exits 1
    Fails,
    /// Exits 0 without printing media info
    Silent,
    /// Prints bytes that are not UTF-8 and well over a pipe buffer of noise on
    /// both streams before succeeding
    Noisy,
}

/// Write a shell script standing in for yt-dlp into `dir`
///
/// The script records its arguments, one per line, to `args.txt` next to it.
/// Returns the script path.
#[cfg(unix)]
pub fn write_fake_ytdlp(dir: &Path, behavior: FakeYtDlp) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script_path = dir.join("yt-dlp");
    let args_path = dir.join("args.txt");
    let media_path = dir.join(format!("{FIXTURE_TITLE}.mp4"));

    let body = match behavior {
        FakeYtDlp::Succeeds => format!(
            r#"echo "[youtube] abc123: Downloading webpage"
echo '[vidfetch:progress] {{"status":"downloading","downloaded_bytes":25,"total_bytes":100,"_speed_str":"1.00MiB/s","_eta_str":"00:03"}}'
echo '[vidfetch:progress] {{"status":"downloading","downloaded_bytes":75,"total_bytes":100,"_speed_str":"1.00MiB/s","_eta_str":"00:01"}}'
echo '[vidfetch:progress] {{"status":"finished","downloaded_bytes":100,"total_bytes":100}}'
echo 'WARNING: fixture warning' >&2
echo '[vidfetch:info] {{"id":"abc123","title":"{title}","ext":"mp4","filepath":"{media}","playlist_title":null}}'
exit 0"#,
            title = FIXTURE_TITLE,
            media = media_path.display(),
        ),
        FakeYtDlp::Fails => r#"echo '[vidfetch:progress] {"status":"downloading","downloaded_bytes":10,"total_bytes":100}'
echo 'WARNING: unable to extract uploader' >&2
echo 'ERROR: [generic] Unsupported URL: https://example.com/nope' >&2
exit 1"#
            .to_string(),
        FakeYtDlp::Silent => "exit 0".to_string(),
        FakeYtDlp::Noisy => format!(
            r#"printf '[download] Destination: caf\351.mp4\n'
printf 'WARNING: caf\351 uses a legacy encoding\n' >&2
i=0
while [ $i -lt 4000 ]; do
  echo "[download] filler line $i padding padding padding padding padding"
  echo "[debug] stderr filler line $i padding padding padding padding" >&2
  i=$((i+1))
done
echo '[vidfetch:progress] {{"status":"downloading","downloaded_bytes":50,"total_bytes":100}}'
echo '[vidfetch:info] {{"id":"abc123","title":"{title}","ext":"mp4","filepath":"{media}","playlist_title":null}}'
exit 0"#,
            title = FIXTURE_TITLE,
            media = media_path.display(),
        ),
    };

    let script = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do printf '%s\\n' \"$arg\"; done > '{}'\n{}\n",
        args_path.display(),
        body
    );

    std::fs::write(&script_path, script).unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();
    script_path
}

/// Arguments the fake yt-dlp in `dir` was last called with
pub fn recorded_args(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("args.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}
