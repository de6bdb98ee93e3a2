//! Recognition of video-hosting URLs.
//!
//! Bare URLs pointing at a known video host are lexed as
//! [`TokenKind::VideoUrl`](crate::TokenKind::VideoUrl) so the generator can
//! emit a lazy mount point instead of a plain anchor.

use std::sync::LazyLock;

use regex::Regex;

/// Known video hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoHost {
    YouTube,
    Vimeo,
}

impl VideoHost {
    pub fn as_str(self) -> &'static str {
        match self {
            VideoHost::YouTube => "youtube",
            VideoHost::Vimeo => "vimeo",
        }
    }
}

/// A video reference extracted from a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoRef<'a> {
    pub host: VideoHost,
    pub id: &'a str,
}

static PATTERNS: LazyLock<Vec<(VideoHost, Regex)>> = LazyLock::new(|| {
    let table = [
        (
            VideoHost::YouTube,
            r"^https?://(?:www\.|m\.)?youtube\.com/watch\?(?:[^#\s]*&)?v=([A-Za-z0-9_-]{11})",
        ),
        (
            VideoHost::YouTube,
            r"^https?://(?:www\.|m\.)?youtube\.com/(?:shorts|embed|live)/([A-Za-z0-9_-]{11})",
        ),
        (VideoHost::YouTube, r"^https?://youtu\.be/([A-Za-z0-9_-]{11})"),
        (VideoHost::Vimeo, r"^https?://(?:www\.)?vimeo\.com/(\d+)"),
    ];
    table
        .into_iter()
        .map(|(host, pattern)| (host, Regex::new(pattern).expect("video pattern is valid")))
        .collect()
});

impl<'a> VideoRef<'a> {
    /// Extracts the host and video id, or `None` when the URL is not a
    /// recognised video link.
    pub fn parse(url: &'a str) -> Option<VideoRef<'a>> {
        PATTERNS.iter().find_map(|(host, re)| {
            let id = re.captures(url)?.get(1)?.as_str();
            Some(VideoRef { host: *host, id })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", VideoHost::YouTube, "dQw4w9WgXcQ")]
    #[case("https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ", VideoHost::YouTube, "dQw4w9WgXcQ")]
    #[case("http://m.youtube.com/watch?v=dQw4w9WgXcQ&t=42", VideoHost::YouTube, "dQw4w9WgXcQ")]
    #[case("https://youtu.be/dQw4w9WgXcQ", VideoHost::YouTube, "dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/shorts/abcdefghijk", VideoHost::YouTube, "abcdefghijk")]
    #[case("https://vimeo.com/76979871", VideoHost::Vimeo, "76979871")]
    fn recognises_video_urls(#[case] url: &str, #[case] host: VideoHost, #[case] id: &str) {
        assert_eq!(VideoRef::parse(url), Some(VideoRef { host, id }));
    }

    #[rstest]
    #[case("https://example.com/watch?v=dQw4w9WgXcQ")]
    #[case("https://www.youtube.com/channel/UC123")]
    #[case("https://vimeo.com/about")]
    #[case("https://youtu.be/short")]
    fn ignores_other_urls(#[case] url: &str) {
        assert_eq!(VideoRef::parse(url), None);
    }
}
