//! Article ingestion rules.
//!
//! Turns the raw bytes of an uploaded `.txt` file into a [`NewArticle`],
//! filling in the title and author from the content when the caller did not
//! supply them.

use std::path::Path;

use crate::entities::NewArticle;
use crate::errors::CoreError;

/// Largest accepted upload, in bytes.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Author recorded when none is supplied and none can be found in the text.
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

const AUTHOR_MARKERS: [&str; 4] = ["作者：", "作者:", "Author:", "By:"];

/// Validate an upload and derive the article fields.
///
/// # Errors
///
/// Returns `CoreError::Validation` if the file is not `.txt`, exceeds
/// [`MAX_FILE_SIZE`], or is not valid UTF-8.
pub fn prepare_article(
    source_path: &Path,
    bytes: Vec<u8>,
    title: Option<&str>,
    author: Option<&str>,
) -> Result<NewArticle, CoreError> {
    let is_txt = source_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    if !is_txt {
        return Err(CoreError::Validation(
            "only .txt files are supported".to_string(),
        ));
    }

    if bytes.len() > MAX_FILE_SIZE {
        return Err(CoreError::Validation(format!(
            "file is {} bytes; the limit is {MAX_FILE_SIZE}",
            bytes.len()
        )));
    }

    let file_size = i64::try_from(bytes.len())
        .map_err(|_| CoreError::Validation("file size out of range".to_string()))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| CoreError::Validation(format!("file is not valid UTF-8: {e}")))?;

    let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => t.to_string(),
        None => extract_title(&content, source_path),
    };
    let author = match author.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => a.to_string(),
        None => extract_author(&content),
    };

    Ok(NewArticle {
        title,
        author,
        content,
        source_path: source_path.to_string_lossy().into_owned(),
        file_size,
    })
}

/// First trimmed line longer than 10 and shorter than 100 bytes, else the file stem.
#[must_use]
pub fn extract_title(content: &str, source_path: &Path) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| line.len() > 10 && line.len() < 100)
        .map_or_else(
            || {
                source_path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            },
            ToString::to_string,
        )
}

/// Text following the first author marker, if short enough to be a name.
#[must_use]
pub fn extract_author(content: &str) -> String {
    for line in content.lines().map(str::trim) {
        for marker in AUTHOR_MARKERS {
            if line.contains(marker) {
                let candidate = line.replacen(marker, "", 1);
                let candidate = candidate.trim();
                if !candidate.is_empty() && candidate.len() < 50 {
                    return candidate.to_string();
                }
            }
        }
    }
    UNKNOWN_AUTHOR.to_string()
}
