//! Local file naming, frontmatter, and path helpers.

use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Maximum slug length.
const SLUG_MAX: usize = 64;

/// Slugifies a title for use in file and folder names.
///
/// Lowercases, collapses every non-alphanumeric run into a single dash,
/// trims dashes, and truncates. An empty result falls back to `untitled`.
pub fn slug(s: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    for c in s.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out.truncate(SLUG_MAX);
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        "untitled".into()
    } else {
        out
    }
}

/// Builds the mirror file name for a page: a slugified title plus a short
/// suffix derived from the page id.
///
/// The suffix (last 8 hex characters of the dash-stripped id) is
/// collision-resistant, not collision-proof.
pub fn page_file_name(title: &str, page_id: &str) -> String {
    let compact: String = page_id.chars().filter(|c| *c != '-').collect();
    let start = compact.len().saturating_sub(8);
    format!("{}-{}.md", slug(title), &compact[start..])
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}

/// Returns a file's modification time as epoch milliseconds.
pub fn file_mtime_ms(path: &Path) -> io::Result<i64> {
    let modified = std::fs::metadata(path)?.modified()?;
    let ms = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    Ok(ms)
}

/// Renders a frontmatter body: one `key: <JSON value>` line per field.
pub fn render_frontmatter(fields: &[(&str, Value)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits a mirror file into its frontmatter fields and body.
///
/// Lenient: a file without a frontmatter header yields empty metadata and
/// the full content as body; a field value that is not valid JSON is kept
/// as a raw string.
pub fn split_frontmatter(content: &str) -> (BTreeMap<String, Value>, &str) {
    let mut meta = BTreeMap::new();
    let Some(after_open) = content.strip_prefix("---\n") else {
        return (meta, content);
    };
    let Some(close) = after_open.find("\n---") else {
        return (meta, content);
    };
    let raw = &after_open[..close];
    let mut rest = &after_open[close + 4..];
    if let Some(stripped) = rest.strip_prefix('\n') {
        rest = stripped;
    }
    for line in raw.lines() {
        let Some(idx) = line.find(':') else { continue };
        let key = line[..idx].trim().to_string();
        let value = line[idx + 1..].trim();
        let parsed = serde_json::from_str(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        meta.insert(key, parsed);
    }
    (meta, rest)
}
