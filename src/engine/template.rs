//! Output template rendering
//!
//! Mirrors the engine's `%(field)s` substitution closely enough to predict where
//! a file lands when the engine did not report the final path itself.

use std::path::PathBuf;

use crate::types::MediaInfo;

/// Substituted for fields the media info does not carry
pub const NA_PLACEHOLDER: &str = "NA";

/// Render `template` against `info`
///
/// Supports `%(field)s` with optional flags/width/precision before the
/// conversion letter, `%(field|default)s` fallbacks and `%%` escapes. Unknown
/// or empty fields render as [`NA_PLACEHOLDER`].
///
/// ```
/// use vidfetch::engine::render_output_template;
/// use vidfetch::MediaInfo;
///
/// let info = MediaInfo {
///     title: "Clip".into(),
///     ext: Some("mkv".into()),
///     ..Default::default()
/// };
/// let path = render_output_template("out/%(playlist_title)s/%(title)s.%(ext)s", &info);
/// assert_eq!(path.to_str(), Some("out/NA/Clip.mkv"));
/// ```
pub fn render_output_template(template: &str, info: &MediaInfo) -> PathBuf {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        rendered.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix("%%") {
            rendered.push('%');
            rest = after;
            continue;
        }

        match parse_field(tail) {
            Some((field, consumed)) => {
                rendered.push_str(&lookup(info, field));
                rest = &tail[consumed..];
            }
            None => {
                rendered.push('%');
                rest = &tail[1..];
            }
        }
    }
    rendered.push_str(rest);

    PathBuf::from(rendered)
}

/// Split `%(field)<spec><conv>` off the front of `s`, returning the field and
/// the number of bytes consumed
fn parse_field(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix("%(")?;
    let close = inner.find(')')?;
    let field = &inner[..close];
    let spec = &inner[close + 1..];

    let conv = spec.find(|c: char| c.is_ascii_alphabetic())?;
    let flags_ok = spec[..conv]
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '#' | '.' | ' '));
    if !flags_ok {
        return None;
    }

    Some((field, "%(".len() + close + ")".len() + conv + 1))
}

fn lookup(info: &MediaInfo, field: &str) -> String {
    let (name, default) = match field.split_once('|') {
        Some((name, default)) => (name, Some(default)),
        None => (field, None),
    };

    let value = match name.trim() {
        "title" | "fulltitle" => Some(info.title.as_str()),
        "id" => info.id.as_deref(),
        "ext" => info.ext.as_deref(),
        "playlist_title" | "playlist" => info.playlist_title.as_deref(),
        _ => None,
    };

    value
        .filter(|v| !v.is_empty())
        .or(default)
        .unwrap_or(NA_PLACEHOLDER)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> MediaInfo {
        MediaInfo {
            title: "Intro Talk".into(),
            id: Some("abc123".into()),
            ext: Some("webm".into()),
            filepath: None,
            playlist_title: Some("Conference 2026".into()),
        }
    }

    #[test]
    fn substitutes_known_fields() {
        let path = render_output_template("dl/%(title)s [%(id)s].%(ext)s", &info());
        assert_eq!(path, PathBuf::from("dl/Intro Talk [abc123].webm"));
    }

    #[test]
    fn playlist_items_land_in_playlist_directory() {
        let path = render_output_template("dl/%(playlist_title)s/%(title)s.%(ext)s", &info());
        assert_eq!(path, PathBuf::from("dl/Conference 2026/Intro Talk.webm"));
    }

    #[test]
    fn missing_fields_render_as_na() {
        let info = MediaInfo {
            title: "Solo".into(),
            ..Default::default()
        };
        let path = render_output_template("%(playlist_title)s/%(title)s.%(ext)s", &info);
        assert_eq!(path, PathBuf::from("NA/Solo.NA"));
    }

    #[test]
    fn default_fallback_is_used_for_missing_fields() {
        let info = MediaInfo {
            title: "Solo".into(),
            ..Default::default()
        };
        let path = render_output_template("%(playlist_title|Singles)s/%(title)s", &info);
        assert_eq!(path, PathBuf::from("Singles/Solo"));
    }

    #[test]
    fn precision_and_escapes_are_handled() {
        let path = render_output_template("100%% %(title).50s", &info());
        assert_eq!(path, PathBuf::from("100% Intro Talk"));
    }

    #[test]
    fn unterminated_placeholder_is_left_alone() {
        let path = render_output_template("50% done %(title", &info());
        assert_eq!(path, PathBuf::from("50% done %(title"));
    }
}
