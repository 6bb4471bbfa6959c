//! Plain-text digest rendering.
//!
//! Blocks are separated by a blank line and never contain one, which is what
//! the chunker in `network` splits on.

use crate::consts::placeholders;
use crate::record::Record;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

pub const HEADER: &str = "🚀 IT Engineering Internships & Alternances 🚀";

fn markup_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[*_`~\[\]]").expect("static pattern"))
}

/// Drop characters a chat client could read as markup and collapse all
/// whitespace, line breaks included, to single spaces
pub fn sanitize(text: &str) -> String {
    markup_chars()
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn display(value: &str, placeholder: &str) -> String {
    let clean = sanitize(value);
    if clean.is_empty() {
        placeholder.to_string()
    } else {
        clean
    }
}

/// One numbered listing block, no trailing newline
pub fn render_entry(index: usize, record: &Record) -> String {
    let link: String = record.identity_key.split_whitespace().collect();
    let link = if link.is_empty() { placeholders::LINK.to_string() } else { link };

    format!(
        "{}. {}\n📌 {}\n📍 {}\n🗓 Posted: {}\n🔗 {}",
        index,
        display(&record.organization, placeholders::ORGANIZATION),
        display(&record.title, placeholders::TITLE),
        display(&record.location, placeholders::LOCATION),
        display(&record.posted_on, placeholders::DATE),
        link
    )
}

/// Header, up to `max_entries` blocks, an overflow line, then the timestamp.
/// Only the last line depends on `generated_at`.
pub fn format_digest(records: &[Record], max_entries: usize, generated_at: NaiveDateTime) -> String {
    let mut message = String::with_capacity(4096);
    message.push_str(HEADER);
    message.push_str("\n\n");

    for (i, record) in records.iter().take(max_entries).enumerate() {
        message.push_str(&render_entry(i + 1, record));
        message.push_str("\n\n");
    }

    if records.len() > max_entries {
        message.push_str(&format!(
            "...and {} more opportunities\n\n",
            records.len() - max_entries
        ));
    }

    message.push_str(&format!("Updated: {}", generated_at.format("%d %b %Y %H:%M")));
    message
}
