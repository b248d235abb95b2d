//! CLI-based engine driving an external yt-dlp binary

use async_trait::async_trait;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{ChildStderr, Command};
use tokio_util::codec::FramedRead;

use super::options::{EngineOptions, Postprocessor};
use super::parser::{
    INFO_MARKER, OutputLine, OutputLineCodec, PROGRESS_MARKER, engine_error_message,
    parse_output_line,
};
use super::traits::{Engine, ProgressHook};
use crate::error::Error;
use crate::types::MediaInfo;

/// Fields requested from yt-dlp once an item is fully written
const INFO_FIELDS: &str = "id,title,ext,filepath,playlist_title";

/// Whether yt-dlp should expand playlist URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaylistPolicy {
    /// Only the item the URL points at
    Single,
    /// Every item in the playlist
    Expand,
}

/// Engine that runs the `yt-dlp` executable
///
/// Options are translated to command-line flags. Progress and media info are
/// read back from stdout, where yt-dlp is told to print them as JSON behind
/// fixed markers; the rest of its output is logged at trace level.
///
/// # Examples
///
/// ```no_run
/// use vidfetch::engine::YtDlpCli;
/// use std::path::PathBuf;
///
/// // Explicit binary
/// let engine = YtDlpCli::new(PathBuf::from("/usr/local/bin/yt-dlp"))
///     .with_ffmpeg_location(PathBuf::from("/opt/ffmpeg/bin"));
///
/// // Or auto-discover from PATH
/// let engine = YtDlpCli::from_path().expect("yt-dlp not found in PATH");
/// ```
#[derive(Debug, Clone)]
pub struct YtDlpCli {
    binary_path: PathBuf,
    ffmpeg_location: Option<PathBuf>,
}

impl YtDlpCli {
    /// Create a new CLI engine with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            ffmpeg_location: None,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// # Returns
    ///
    /// `Some(YtDlpCli)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Point yt-dlp at a specific ffmpeg binary or directory
    pub fn with_ffmpeg_location(mut self, location: PathBuf) -> Self {
        self.ffmpeg_location = Some(location);
        self
    }

    /// Binary this engine runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn build_args(
        &self,
        options: &EngineOptions,
        policy: PlaylistPolicy,
        urls: &[String],
    ) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format.clone(),
            "-o".to_string(),
            options.outtmpl.clone(),
        ];

        for pp in &options.postprocessors {
            match pp {
                // yt-dlp merges on its own whenever the format joins streams
                Postprocessor::Merger => {}
                Postprocessor::ExtractAudio { codec, quality } => {
                    args.extend([
                        "--extract-audio".to_string(),
                        "--audio-format".to_string(),
                        codec.clone(),
                        "--audio-quality".to_string(),
                        audio_quality_arg(quality),
                    ]);
                }
            }
        }

        // A transcoded audio file has no container to merge into
        if let Some(container) = &options.merge_output_format
            && !options.extracts_audio()
        {
            args.push("--merge-output-format".to_string());
            args.push(container.clone());
        }
        if let Some(location) = &self.ffmpeg_location {
            args.push("--ffmpeg-location".to_string());
            args.push(location.to_string_lossy().into_owned());
        }
        if options.quiet {
            args.push("--quiet".to_string());
        }
        if options.no_warnings {
            args.push("--no-warnings".to_string());
        }

        args.push(
            match policy {
                PlaylistPolicy::Single => "--no-playlist",
                PlaylistPolicy::Expand => "--yes-playlist",
            }
            .to_string(),
        );

        // --print implies --quiet, so progress output has to be forced back on
        args.extend([
            "--newline".to_string(),
            "--progress".to_string(),
            "--progress-template".to_string(),
            format!("download:{PROGRESS_MARKER}%(progress)j"),
            "--print".to_string(),
            format!("after_move:{INFO_MARKER}%(.{{{INFO_FIELDS}}})j"),
            "--".to_string(),
        ]);
        args.extend(urls.iter().cloned());
        args
    }

    async fn run(
        &self,
        options: &EngineOptions,
        policy: PlaylistPolicy,
        urls: &[String],
        hook: &dyn ProgressHook,
    ) -> crate::Result<Vec<MediaInfo>> {
        let args = self.build_args(options, policy, urls);
        tracing::debug!(binary = %self.binary_path.display(), ?args, "Spawning yt-dlp");

        let mut child = Command::new(&self.binary_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ExternalTool("yt-dlp stdout was not captured".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ExternalTool("yt-dlp stderr was not captured".into()))?;
        let stderr_reader = tokio::spawn(collect_stderr(stderr));

        // Read stdout to EOF; a pipe left unread would block yt-dlp and `wait` forever
        let mut infos = Vec::new();
        let mut lines = FramedRead::new(stdout, OutputLineCodec::new());
        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "Stopped reading yt-dlp output");
                    break;
                }
            };

            match parse_output_line(&line) {
                Ok(OutputLine::Progress(record)) => hook.on_progress(&record),
                Ok(OutputLine::Info(info)) => {
                    tracing::debug!(title = %info.title, "yt-dlp finished item");
                    infos.push(info);
                }
                Ok(OutputLine::Other(text)) => tracing::trace!(line = %text, "yt-dlp"),
                Err(e) => tracing::debug!(error = %e, line = %line, "Unparseable yt-dlp record"),
            }
        }
        // Closing the pipe after a read error lets yt-dlp exit instead of blocking
        drop(lines);

        let status = child
            .wait()
            .await
            .map_err(|e| Error::ExternalTool(format!("Failed to wait for yt-dlp: {}", e)))?;
        let stderr = stderr_reader.await.unwrap_or_default();

        if !status.success() {
            return Err(Error::Engine(engine_error_message(&stderr, status.code())));
        }
        Ok(infos)
    }
}

#[async_trait]
impl Engine for YtDlpCli {
    async fn extract_info(
        &self,
        options: &EngineOptions,
        url: &str,
        hook: &dyn ProgressHook,
    ) -> crate::Result<MediaInfo> {
        let urls = [url.to_string()];
        let mut infos = self.run(options, PlaylistPolicy::Single, &urls, hook).await?;
        infos
            .pop()
            .ok_or_else(|| Error::Engine("yt-dlp finished without reporting media info".into()))
    }

    async fn download(
        &self,
        options: &EngineOptions,
        urls: &[String],
        hook: &dyn ProgressHook,
    ) -> crate::Result<()> {
        let infos = self.run(options, PlaylistPolicy::Expand, urls, hook).await?;
        tracing::info!(items = infos.len(), "yt-dlp download finished");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "yt-dlp-cli"
    }
}

/// yt-dlp reads quality values above 10 as VBR levels unless suffixed with `K`
fn audio_quality_arg(quality: &str) -> String {
    match quality.trim().parse::<u32>() {
        Ok(kbps) if kbps > 10 => format!("{kbps}K"),
        _ => quality.trim().to_string(),
    }
}

async fn collect_stderr(stderr: ChildStderr) -> String {
    let mut collected = String::new();
    let mut lines = FramedRead::new(stderr, OutputLineCodec::new());
    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Stopped reading yt-dlp stderr");
                break;
            }
        };
        if line.starts_with("WARNING:") {
            tracing::warn!(line = %line, "yt-dlp");
        } else {
            tracing::debug!(line = %line, "yt-dlp stderr");
        }
        collected.push_str(&line);
        collected.push('\n');
    }
    collected
}
