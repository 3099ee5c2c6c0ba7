//! Text formatting shared by the views

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// Characters of post content shown on a feed card
pub const PREVIEW_CHARS: usize = 200;

/// Post content as shown on a feed card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    /// Whether the content was cut and a "Read more" link applies
    pub truncated: bool,
}

/// First [`PREVIEW_CHARS`] characters of `content`, with "..." when cut
pub fn preview(content: &str) -> Preview {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((end, _)) => Preview {
            text: format!("{}...", &content[..end]),
            truncated: true,
        },
        None => Preview {
            text: content.to_string(),
            truncated: false,
        },
    }
}

/// Paragraphs of `content`, split on blank lines, empty ones dropped
pub fn paragraphs(content: &str) -> Vec<String> {
    static BLANK_LINE: OnceLock<Regex> = OnceLock::new();
    let regex =
        BLANK_LINE.get_or_init(|| Regex::new(r"\n\s*\n").expect("Failed to compile paragraph regex"));

    regex
        .split(content)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn like_label(count: u64) -> String {
    if count == 1 {
        "1 like".to_string()
    } else {
        format!("{count} likes")
    }
}

/// "Jan 5, 2024"
pub fn date(value: &DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}
