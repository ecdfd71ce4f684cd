use regex::Regex;
use std::sync::OnceLock;

use crate::errors::{ParishError, ParishResult};

fn youtube_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://(www\.)?(youtube\.com|youtu\.be)/.+$").expect("valid regex")
    })
}

fn youtube_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?:youtu\.be/|youtube\.com/(?:embed/|v/|live/|watch\?v=|watch\?.+&v=))([^&?/]+)",
        )
        .expect("valid regex")
    })
}

/// Accepts only YouTube watch, live, embed or short links.
pub fn validate_youtube_url(url: &str) -> ParishResult<String> {
    let url = url.trim();
    if youtube_url_pattern().is_match(url) {
        Ok(url.to_string())
    } else {
        Err(ParishError::Validation("Invalid YouTube URL".to_string()))
    }
}

/// Extracts the video id used to build the embedded player.
pub fn youtube_video_id(url: &str) -> Option<String> {
    youtube_id_pattern()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

/// Embeddable player URL for a stored livestream link.
pub fn embed_url(url: &str) -> Option<String> {
    youtube_video_id(url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}
