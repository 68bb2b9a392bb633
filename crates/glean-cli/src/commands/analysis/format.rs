//! Display formatting for numbered facet text.
//!
//! LLM replies often pack a numbered list onto one line (`1、… 2、…` or
//! `1. …; 2. …`). Stored facets are left untouched; this only shapes what
//! `glean analysis get` prints.

use std::sync::LazyLock;

use regex::Regex;

struct Patterns {
    marker_after_space: Regex,
    semicolon_item: Regex,
    semicolon: Regex,
    blank_lines: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            marker_after_space: Regex::new(r"\s+(\d+)[.、]")?,
            semicolon_item: Regex::new(r"(\d+)[.、]([^；;]+)[;；]\s*(\d+)[.、]")?,
            semicolon: Regex::new(r"[;；]")?,
            blank_lines: Regex::new(r"\n\s*\n")?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

/// Put numbered items on their own lines. Text without a `1.`/`1、` marker is
/// returned unchanged.
pub fn format_facet(text: &str) -> anyhow::Result<String> {
    if !text.contains("1.") && !text.contains("1、") {
        return Ok(text.to_string());
    }

    let patterns = PATTERNS
        .as_ref()
        .map_err(|error| anyhow::anyhow!("invalid facet pattern: {error}"))?;

    let text = patterns.marker_after_space.replace_all(text, "\n${1}.");
    let text = patterns
        .semicolon_item
        .replace_all(&text, "${1}.${2}\n${3}.");
    let text = patterns.semicolon.replace_all(&text, "\n");
    let text = patterns.blank_lines.replace_all(text.trim(), "\n");

    Ok(text.into_owned())
}
