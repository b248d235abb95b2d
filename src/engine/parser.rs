//! Parser for yt-dlp's line-oriented output
//!
//! The CLI engine asks yt-dlp to emit two kinds of machine-readable lines, each
//! behind a fixed marker: progress records (one JSON object per hook call) and
//! media info (one JSON object per finished item). Everything else is log noise.

use bytes::BytesMut;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder};

use crate::types::MediaInfo;

/// Longest output line kept; longer lines are skipped whole
pub(crate) const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Prefix yt-dlp puts in front of every progress record
pub(crate) const PROGRESS_MARKER: &str = "[vidfetch:progress] ";

/// Prefix yt-dlp puts in front of every media info record
pub(crate) const INFO_MARKER: &str = "[vidfetch:info] ";

/// One classified line of engine output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputLine {
    /// Raw progress hook record
    Progress(serde_json::Value),
    /// Media info for a finished item
    Info(MediaInfo),
    /// Anything else
    Other(String),
}

/// Classify a stdout line
///
/// # Errors
///
/// Returns `Error::Serialization` when a marked line does not carry valid JSON.
pub fn parse_output_line(line: &str) -> crate::Result<OutputLine> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(json) = line.strip_prefix(PROGRESS_MARKER) {
        return Ok(OutputLine::Progress(serde_json::from_str(json)?));
    }
    if let Some(json) = line.strip_prefix(INFO_MARKER) {
        return Ok(OutputLine::Info(serde_json::from_str(json)?));
    }
    Ok(OutputLine::Other(line.to_string()))
}

/// Build the failure message for a non-zero exit
///
/// Prefers the last `ERROR:` line yt-dlp printed, then the last non-empty stderr
/// line, then the bare exit status.
pub fn engine_error_message(stderr: &str, exit_code: Option<i32>) -> String {
    let lines = || stderr.lines().map(str::trim).filter(|l| !l.is_empty());

    if let Some(error_line) = lines().rfind(|l| l.starts_with("ERROR:")) {
        return error_line.to_string();
    }
    if let Some(last) = lines().next_back() {
        return last.to_string();
    }
    match exit_code {
        Some(code) => format!("yt-dlp exited with status {code}"),
        None => "yt-dlp was terminated by a signal".to_string(),
    }
}

/// Newline-delimited decoder for engine pipes that never gives up on a stream
///
/// Lines are decoded lossily, so bytes that are not UTF-8 (titles in a legacy
/// locale) cannot end the stream. A line over [`MAX_LINE_LENGTH`] is dropped
/// and decoding resumes at the next newline. Only I/O errors are reported.
#[derive(Debug)]
pub(crate) struct OutputLineCodec {
    inner: AnyDelimiterCodec,
}

impl OutputLineCodec {
    pub(crate) fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    pub(crate) fn with_max_length(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), b"\n".to_vec(), max_length),
        }
    }

    fn lossy(
        result: Result<Option<bytes::Bytes>, AnyDelimiterCodecError>,
    ) -> Result<Option<Option<String>>, std::io::Error> {
        match result {
            Ok(Some(chunk)) => Ok(Some(Some(String::from_utf8_lossy(&chunk).into_owned()))),
            Ok(None) => Ok(None),
            Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => {
                tracing::debug!("Skipping oversized yt-dlp output line");
                Ok(Some(None))
            }
            Err(AnyDelimiterCodecError::Io(e)) => Err(e),
        }
    }
}

impl Decoder for OutputLineCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, std::io::Error> {
        loop {
            match Self::lossy(self.inner.decode(buf))? {
                Some(Some(line)) => return Ok(Some(line)),
                // Oversized line; the inner codec is now discarding up to the next newline
                Some(None) => continue,
                None => return Ok(None),
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, std::io::Error> {
        loop {
            match Self::lossy(self.inner.decode_eof(buf))? {
                Some(Some(line)) => return Ok(Some(line)),
                Some(None) => continue,
                None => return Ok(None),
            }
        }
    }
}
