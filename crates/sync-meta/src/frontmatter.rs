//! Frontmatter document codec.
//!
//! A resource document is an optional `---` delimited YAML header followed
//! by a free-text body. The header scan is an explicit two-state machine
//! (header open / header closed) because the boundary inputs are easy to get
//! subtly wrong: an empty header, an unterminated header, and content that
//! merely starts with `---` without opening a header at all.

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// What serde_yaml emits for a struct whose every field was skipped.
const EMPTY_MAPPING: &str = "{}";

/// Split a document into parsed header metadata and body.
///
/// Returns `(None, content)` when the document has no header; the whole
/// document is then body. An empty header (`---` immediately followed by
/// `---`) parses as default metadata.
///
/// # Errors
///
/// Fails when a header is opened but never closed, or when the header is
/// not valid YAML for `T`.
pub fn parse<T: DeserializeOwned>(content: &str) -> Result<(Option<T>, &str)> {
    // State 1: is the header open? Only a line that is exactly `---`
    // opens it; `----` or `--- title` is ordinary body text.
    let Some(after_open) = strip_delimiter_line(content) else {
        return Ok((None, content));
    };

    // State 2: header is open; every subsequent line start is a candidate
    // for the closing delimiter.
    let header_start = content.len() - after_open.len();
    let mut cursor = after_open;
    loop {
        if let Some(after_close) = strip_delimiter_line(cursor) {
            let header_end = content.len() - cursor.len();
            let yaml = &content[header_start..header_end];
            let body = skip_one_blank_line(&content[content.len() - after_close.len()..]);
            let meta = parse_yaml(yaml)?;
            return Ok((Some(meta), body));
        }
        match cursor.find('\n') {
            Some(idx) => cursor = &cursor[idx + 1..],
            None => return Err(Error::UnterminatedHeader),
        }
    }
}

/// Render metadata and body back into a document.
///
/// Metadata that serializes to an empty mapping produces a body-only
/// document with no header block, so `parse(format(meta, body))` preserves
/// the absent-vs-empty distinction for optional fields.
pub fn format<T: Serialize>(meta: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(meta)?;
    if yaml.trim() == EMPTY_MAPPING || yaml.trim().is_empty() {
        return Ok(body.to_string());
    }
    Ok(render(&yaml, body))
}

/// Like [`format`], but always emits a header block, even when the metadata
/// is entirely empty (rendered as `---\n---\n`).
///
/// Kinds that mandate a header on read must write through this, so the
/// document a store just produced is accepted by its own `parse`.
pub fn format_always<T: Serialize>(meta: &T, body: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(meta)?;
    let yaml = if yaml.trim() == EMPTY_MAPPING {
        ""
    } else {
        yaml.as_str()
    };
    Ok(render(yaml, body))
}

fn render(yaml: &str, body: &str) -> String {
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str("---\n");
    out.push_str(yaml);
    if !yaml.is_empty() && !yaml.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// If `s` starts with a delimiter line (exactly `---`), return the content
/// after that line.
fn strip_delimiter_line(s: &str) -> Option<&str> {
    let (line, rest) = match s.find('\n') {
        Some(idx) => (&s[..idx], &s[idx + 1..]),
        None => (s, ""),
    };
    if line.trim_end_matches('\r') == "---" {
        Some(rest)
    } else {
        None
    }
}

/// Skip at most one blank line, the separator `format` writes after the
/// closing delimiter.
fn skip_one_blank_line(s: &str) -> &str {
    if let Some(rest) = s.strip_prefix("\r\n") {
        rest
    } else if let Some(rest) = s.strip_prefix('\n') {
        rest
    } else {
        s
    }
}

fn parse_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T> {
    let source = if yaml.trim().is_empty() {
        EMPTY_MAPPING
    } else {
        yaml
    };
    Ok(serde_yaml::from_str(source)?)
}
