pub mod analysis;
pub mod consult;
pub mod documents;
pub mod statutes;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Date line used in generated documents, e.g. `2024/5/6`.
pub(crate) fn date_line(date: chrono::NaiveDate) -> String {
    date.format("%Y/%-m/%-d").to_string()
}

/// The widest `open ... close` span in `text`, from the first opener to the
/// last closer. Models often wrap JSON in prose or code fences.
pub(crate) fn outer_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse a JSON object out of a model reply.
pub(crate) fn parse_json_object<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let body = outer_span(reply, '{', '}').unwrap_or(reply.trim());
    serde_json::from_str(body).with_context(|| {
        format!("reply is not the expected JSON object ({} bytes)", reply.len())
    })
}
