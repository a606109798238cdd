use std::path::Path;

use url::Url;

use crate::domain::AppError;

/// Placeholder used when a media URL carries no file extension.
pub const UNKNOWN_EXTENSION: &str = ".unknown";

/// Title used when the page has no usable `og:title`.
pub const UNKNOWN_TITLE: &str = "unknown";

const ILLEGAL_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Parse the page URL given on the command line.
///
/// Only absolute URLs with a host are accepted; nothing touches the network.
pub fn parse_page_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| AppError::InvalidInput(format!("{}: {}", raw, e)))?;

    if !url.has_host() {
        return Err(AppError::InvalidInput(format!("{}: missing host", raw)));
    }

    Ok(url)
}

/// Shape a raw page title into a song name.
///
/// Drops everything after the first `|` unless the following segment is a
/// `by @artist` attribution, then turns the first ` by @` into `_by_`.
pub fn song_name(title: Option<&str>) -> String {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNKNOWN_TITLE);

    let mut segments = title.split('|').map(str::trim);
    let mut name = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        if !segment.starts_with("by @") {
            break;
        }
        name.push(' ');
        name.push_str(segment);
    }

    name.replacen(" by @", "_by_", 1)
}

/// Sanitize a song name into a lowercase filename component.
///
/// Removes characters that are illegal on common filesystems (and control
/// characters), collapses each whitespace run into a single `_`.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if ILLEGAL_FILENAME_CHARS.contains(&c) || c.is_control() {
            continue;
        }
        if pending_space {
            out.push('_');
            pending_space = false;
        }
        out.extend(c.to_lowercase());
    }

    if pending_space {
        out.push('_');
    }

    out
}

/// File extension (with the leading dot) of the URL's last path segment.
pub fn extension_of(url: &Url) -> String {
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => UNKNOWN_EXTENSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_page_url() {
        assert!(parse_page_url("https://suno.com/song/abc").is_ok());
        assert!(parse_page_url("http://localhost:8080/x").is_ok());
        assert!(parse_page_url("not a url").is_err());
        assert!(parse_page_url("").is_err());
        assert!(parse_page_url("/relative/path").is_err());
        assert!(parse_page_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_parse_page_url_reports_input() {
        let err = parse_page_url("not a url").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_song_name() {
        assert_eq!(song_name(Some("Song Title | by @artist")), "Song Title_by_artist");
        assert_eq!(song_name(Some("Night Drive by @someone | Suno")), "Night Drive_by_someone");
        assert_eq!(song_name(Some("Plain | Suno | extra")), "Plain");
        assert_eq!(song_name(Some("   ")), "unknown");
        assert_eq!(song_name(None), "unknown");
    }

    #[test]
    fn test_song_name_replaces_first_attribution_only() {
        assert_eq!(song_name(Some("a by @b by @c")), "a_by_b by @c");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Song Title_by_artist"), "song_title_by_artist");
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "abcdefghij");
        assert_eq!(sanitize_filename("tabs\t\tand  \n spaces"), "tabs_and_spaces");
        assert_eq!(sanitize_filename("a < b"), "a_b");
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename("???"), "");
    }

    #[test]
    fn test_sanitize_filename_is_idempotent() {
        let inputs = [
            "Song Title | by @artist",
            "  Leading and trailing  ",
            "MiXeD CaSe ÄÖÜ İstanbul",
            "a<>b::c\"\"d",
            "\u{7}bell and\u{a0}nbsp",
            "",
        ];
        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_sanitize_filename_output_is_clean() {
        let out = sanitize_filename("What? Is * this: <a> \"song\" / \\ |here|\t\r\n");
        assert!(!out.contains(ILLEGAL_FILENAME_CHARS));
        assert!(!out.chars().any(char::is_whitespace));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(&url("https://x.com/a/b.mp3")), ".mp3");
        assert_eq!(extension_of(&url("https://x.com/a/b")), ".unknown");
        assert_eq!(extension_of(&url("https://x.com/")), ".unknown");
        assert_eq!(extension_of(&url("https://x.com/a/b.")), ".unknown");
        assert_eq!(extension_of(&url("https://x.com/a/.hidden")), ".unknown");
        assert_eq!(extension_of(&url("https://cdn.x.com/img/c.jpeg?w=100#top")), ".jpeg");
        assert_eq!(extension_of(&url("https://x.com/dir.v2/file")), ".unknown");
    }
}
