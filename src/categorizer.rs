//! Link classification: maps an arbitrary URL to a content type and category
//! using the platform table, a base-domain fallback and file-extension sniffing.
//!
//! Everything here is pure. The tables are built once per process and never
//! mutated, so every function is safe to call from any number of tasks.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

/// Coarse grouping used for filtering saved links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Social,
    Video,
    Code,
    Article,
    Audio,
    Image,
    Document,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Social,
        Category::Video,
        Category::Code,
        Category::Article,
        Category::Audio,
        Category::Image,
        Category::Document,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Social => "social",
            Category::Video => "video",
            Category::Code => "code",
            Category::Article => "article",
            Category::Audio => "audio",
            Category::Image => "image",
            Category::Document => "document",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// A known hosting domain and the classification it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformRule {
    pub domain: &'static str,
    pub content_type: &'static str,
    pub category: Category,
    /// Whether the platform offers an embeddable player or card.
    pub embed_support: bool,
}

const fn rule(
    domain: &'static str,
    content_type: &'static str,
    category: Category,
    embed_support: bool,
) -> PlatformRule {
    PlatformRule { domain, content_type, category, embed_support }
}

/// Domain table. Keys must stay unique.
pub const PLATFORM_RULES: &[PlatformRule] = &[
    // Social
    rule("twitter.com", "twitter", Category::Social, true),
    rule("x.com", "twitter", Category::Social, true),
    rule("instagram.com", "instagram", Category::Social, true),
    rule("linkedin.com", "linkedin", Category::Social, true),
    rule("facebook.com", "facebook", Category::Social, true),
    rule("tiktok.com", "tiktok", Category::Social, true),
    rule("reddit.com", "reddit", Category::Social, true),
    // Video
    rule("youtube.com", "youtube", Category::Video, true),
    rule("youtu.be", "youtube", Category::Video, true),
    rule("vimeo.com", "vimeo", Category::Video, true),
    rule("twitch.tv", "twitch", Category::Video, true),
    rule("dailymotion.com", "dailymotion", Category::Video, true),
    // Code
    rule("github.com", "github", Category::Code, false),
    rule("gitlab.com", "gitlab", Category::Code, false),
    rule("codepen.io", "codepen", Category::Code, true),
    rule("codesandbox.io", "codesandbox", Category::Code, true),
    rule("stackoverflow.com", "stackoverflow", Category::Code, false),
    rule("replit.com", "replit", Category::Code, true),
    // Articles
    rule("medium.com", "medium", Category::Article, false),
    rule("dev.to", "dev", Category::Article, false),
    rule("hashnode.com", "hashnode", Category::Article, false),
    rule("substack.com", "substack", Category::Article, false),
    // Audio
    rule("spotify.com", "spotify", Category::Audio, true),
    rule("soundcloud.com", "soundcloud", Category::Audio, true),
    rule("music.apple.com", "apple-music", Category::Audio, true),
    // Images
    rule("imgur.com", "imgur", Category::Image, false),
    rule("pinterest.com", "pinterest", Category::Image, false),
    rule("flickr.com", "flickr", Category::Image, false),
    // Documents
    rule("docs.google.com", "google-docs", Category::Document, true),
    rule("notion.so", "notion", Category::Document, false),
    rule("dropbox.com", "dropbox", Category::Document, false),
];

/// Every content type a saved link may carry, including the generic file kinds.
pub const CONTENT_TYPES: &[&str] = &[
    // Social
    "twitter", "instagram", "linkedin", "facebook", "tiktok", "reddit",
    // Video
    "youtube", "vimeo", "twitch", "dailymotion",
    // Code
    "github", "gitlab", "codepen", "codesandbox", "stackoverflow", "replit",
    // Article
    "medium", "dev", "hashnode", "substack", "article",
    // Audio
    "spotify", "soundcloud", "apple-music",
    // Image
    "imgur", "pinterest", "flickr", "image",
    // Document
    "google-docs", "notion", "dropbox", "document",
    // Generic media
    "video", "audio",
    "other",
];

pub fn is_known_content_type(content_type: &str) -> bool {
    CONTENT_TYPES.contains(&content_type)
}

/// A content type inferred from the URL's file extension alone.
#[derive(Debug, Clone, Copy)]
pub struct FileTypePattern {
    pub content_type: &'static str,
    pub category: Category,
    pub extensions: &'static [&'static str],
}

/// Checked in this order; the first match wins.
pub const FILE_TYPE_PATTERNS: &[FileTypePattern] = &[
    FileTypePattern {
        content_type: "image",
        category: Category::Image,
        extensions: &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico"],
    },
    FileTypePattern {
        content_type: "video",
        category: Category::Video,
        extensions: &["mp4", "webm", "ogg", "mov", "avi", "mkv"],
    },
    FileTypePattern {
        content_type: "audio",
        category: Category::Audio,
        extensions: &["mp3", "wav", "ogg", "m4a", "flac", "aac"],
    },
    FileTypePattern {
        content_type: "document",
        category: Category::Document,
        extensions: &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "rtf"],
    },
];

static PLATFORMS: LazyLock<HashMap<&'static str, &'static PlatformRule>> =
    LazyLock::new(|| PLATFORM_RULES.iter().map(|r| (r.domain, r)).collect());

// Extension must be followed by end of input or a query string that holds no
// line terminator (\n, \r, U+2028, U+2029). Case folding is ASCII-only so that
// e.g. the Kelvin sign never stands in for `k`.
static FILE_MATCHERS: LazyLock<Vec<(&'static FileTypePattern, Regex)>> = LazyLock::new(|| {
    FILE_TYPE_PATTERNS
        .iter()
        .map(|p| {
            let pattern = format!(
                r"\.(?i-u:{})(\?[^\n\r\x{{2028}}\x{{2029}}]*)?$",
                p.extensions.join("|")
            );
            match Regex::new(&pattern) {
                Ok(regex) => (p, regex),
                Err(err) => panic!("Invalid file type regex for {}: {err}", p.content_type),
            }
        })
        .collect()
});

/// Outcome of [`categorize_link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub category: Category,
    /// Lowercase host without `www.`, the matched base domain, or `"unknown"`.
    pub domain: String,
}

/// Prefix `https://` unless the string already starts with an http(s) scheme.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

pub fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Lowercase hostname with a single leading `www.` removed, or `""` when the
/// string is not an absolute URL or carries no host.
pub fn extract_domain(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else { return String::new(); };
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

/// Last two labels of `domain`. Multi-part public suffixes are not special-cased,
/// so `foo.co.uk` reduces to `co.uk`.
pub fn base_domain(domain: &str) -> &str {
    let mut dots = domain.rmatch_indices('.').map(|(i, _)| i);
    match (dots.next(), dots.next()) {
        (Some(_), Some(second)) => &domain[second + 1..],
        _ => domain,
    }
}

pub fn platform_rule(domain: &str) -> Option<&'static PlatformRule> {
    PLATFORMS.get(domain).copied()
}

pub fn match_file_type(url: &str) -> Option<&'static FileTypePattern> {
    FILE_MATCHERS
        .iter()
        .find(|(_, regex)| regex.is_match(url))
        .map(|(pattern, _)| *pattern)
}

/// Classify a URL. Precedence: exact domain, base domain, file extension, default.
pub fn categorize_link(url: &str) -> ClassificationResult {
    let domain = extract_domain(url);

    if let Some(rule) = platform_rule(&domain) {
        return ClassificationResult {
            content_type: rule.content_type,
            category: rule.category,
            domain,
        };
    }

    let base = base_domain(&domain);
    if base != domain {
        if let Some(rule) = platform_rule(base) {
            return ClassificationResult {
                content_type: rule.content_type,
                category: rule.category,
                domain: base.to_string(),
            };
        }
    }

    let domain = if domain.is_empty() { "unknown".to_string() } else { domain };

    match match_file_type(url) {
        Some(file) => ClassificationResult {
            content_type: file.content_type,
            category: file.category,
            domain,
        },
        None => ClassificationResult {
            content_type: "other",
            category: Category::Other,
            domain,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn triple(url: &str) -> (&'static str, Category, String) {
        let r = categorize_link(url);
        (r.content_type, r.category, r.domain)
    }

    #[test]
    fn normalize_adds_scheme_only_when_missing() {
        assert_eq!(normalize_url("example.com/x"), "https://example.com/x");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("https://example.com"), "https://example.com");
        // prefix check is case-sensitive
        assert_eq!(normalize_url("HTTP://example.com"), "https://HTTP://example.com");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["", "example.com", "http://a.b", "HTTPS://x", "ftp://files", "  spaced "] {
            let once = normalize_url(raw);
            assert_eq!(normalize_url(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn validity_follows_url_parsing() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp:// broken"));
        assert!(!is_valid_url("https://"));
    }

    #[test]
    fn extract_domain_strips_single_www_and_lowercases() {
        assert_eq!(extract_domain("https://WWW.GitHub.com/org"), "github.com");
        assert_eq!(extract_domain("https://www.www.example.com"), "www.example.com");
        assert_eq!(extract_domain("https://blog.example.com/post"), "blog.example.com");
        assert_eq!(extract_domain("not a url"), "");
        assert_eq!(extract_domain("mailto:someone@example.com"), "");
    }

    #[test]
    fn base_domain_keeps_last_two_labels() {
        assert_eq!(base_domain("sub.medium.com"), "medium.com");
        assert_eq!(base_domain("a.b.c.d"), "c.d");
        assert_eq!(base_domain("medium.com"), "medium.com");
        assert_eq!(base_domain("localhost"), "localhost");
        assert_eq!(base_domain(""), "");
        assert_eq!(base_domain("foo.co.uk"), "co.uk");
    }

    #[test]
    fn platform_domains_are_unique() {
        let mut seen = HashSet::new();
        for r in PLATFORM_RULES {
            assert!(seen.insert(r.domain), "duplicate rule for {}", r.domain);
            assert!(
                is_known_content_type(r.content_type),
                "{} missing from CONTENT_TYPES",
                r.content_type
            );
        }
        assert_eq!(PLATFORMS.len(), PLATFORM_RULES.len());
    }

    #[test]
    fn file_types_match_extension_before_query_only() {
        assert_eq!(match_file_type("https://x.test/a.PNG").map(|p| p.content_type), Some("image"));
        assert_eq!(
            match_file_type("https://x.test/a.mp4?t=10").map(|p| p.content_type),
            Some("video")
        );
        assert_eq!(match_file_type("https://x.test/a.flac").map(|p| p.content_type), Some("audio"));
        assert_eq!(
            match_file_type("https://x.test/a.pdf?").map(|p| p.content_type),
            Some("document")
        );
        assert!(match_file_type("https://x.test/a.pdf#page=2").is_none());
        assert!(match_file_type("https://x.test/a.pdf/").is_none());
        assert!(match_file_type("https://x.test/apng").is_none());
        // ogg is listed for both video and audio; video is checked first
        assert_eq!(
            match_file_type("https://x.test/a.ogg").map(|p| p.category),
            Some(Category::Video)
        );
        // no unicode case folding: U+212A KELVIN SIGN is not `k`
        assert!(match_file_type("https://x.test/a.m\u{212A}v").is_none());
    }

    #[test]
    fn line_terminators_end_the_query_match() {
        assert_eq!(
            match_file_type("https://x.test/a.png?a=b c").map(|p| p.content_type),
            Some("image")
        );
        for sep in ['\n', '\r', '\u{2028}', '\u{2029}'] {
            let url = format!("https://a.test/x.png?a{sep}b");
            assert!(match_file_type(&url).is_none(), "{url:?}");
        }
        assert_eq!(
            triple("https://a.test/x.png?a\rb"),
            ("other", Category::Other, "a.test".into())
        );
    }

    #[test]
    fn documented_scenarios() {
        assert_eq!(
            triple("https://youtu.be/abc123"),
            ("youtube", Category::Video, "youtu.be".into())
        );
        assert_eq!(
            triple("https://x.com/user/status/1"),
            ("twitter", Category::Social, "x.com".into())
        );
        assert_eq!(
            triple("https://www.github.com/org/repo"),
            ("github", Category::Code, "github.com".into())
        );
        assert_eq!(
            triple("https://imgur.com/gallery/foo.jpg"),
            ("imgur", Category::Image, "imgur.com".into())
        );
        assert_eq!(triple("ftp:// broken"), ("other", Category::Other, "unknown".into()));
    }

    #[test]
    fn exact_match_reports_unreduced_domain() {
        assert_eq!(
            triple("https://music.apple.com/album/1?x=y.mp3"),
            ("apple-music", Category::Audio, "music.apple.com".into())
        );
        assert_eq!(
            triple("https://docs.google.com/document/d/1"),
            ("google-docs", Category::Document, "docs.google.com".into())
        );
    }

    #[test]
    fn base_domain_fallback_reports_base() {
        assert_eq!(
            triple("https://sub.medium.com/post"),
            ("medium", Category::Article, "medium.com".into())
        );
        assert_eq!(
            triple("https://open.spotify.com/track/1"),
            ("spotify", Category::Audio, "spotify.com".into())
        );
        // base domain beats the file extension
        assert_eq!(
            triple("https://i.imgur.com/abc.png"),
            ("imgur", Category::Image, "imgur.com".into())
        );
    }

    #[test]
    fn file_extension_fallback_is_domain_independent() {
        assert_eq!(
            triple("https://random-cdn.example/asset.png"),
            ("image", Category::Image, "random-cdn.example".into())
        );
        assert_eq!(
            triple("https://files.test/report.PDF?dl=1"),
            ("document", Category::Document, "files.test".into())
        );
    }

    #[test]
    fn default_fallback() {
        assert_eq!(
            triple("https://example.com/some/page"),
            ("other", Category::Other, "example.com".into())
        );
    }

    #[test]
    fn invalid_input_never_panics() {
        assert_eq!(triple("not a url"), ("other", Category::Other, "unknown".into()));
        assert_eq!(triple(""), ("other", Category::Other, "unknown".into()));
        // file matching still runs on the raw string
        assert_eq!(triple("holiday photo.jpg"), ("image", Category::Image, "unknown".into()));
    }

    #[test]
    fn category_round_trips_through_str() {
        for c in Category::ALL {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
        assert!("podcast".parse::<Category>().is_err());
    }

    #[test]
    fn classification_serializes_type_key() {
        let json = serde_json::to_value(categorize_link("https://github.com/a/b")).unwrap();
        assert_eq!(json["type"], "github");
        assert_eq!(json["category"], "code");
        assert_eq!(json["domain"], "github.com");
    }
}
