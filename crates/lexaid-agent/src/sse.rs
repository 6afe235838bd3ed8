//! Record scanning for the `data:`-prefixed event stream.

use tracing::debug;

use crate::event::ChatCompletion;

pub const DATA_PREFIX: &str = "data:";
pub const DONE_SENTINEL: &str = "[DONE]";

/// What one newline-terminated record means to the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Delta(String),
    Done,
    /// Blank, unprefixed, malformed, or carrying no text.
    Skip,
}

/// Classify one record. `line` has already had its terminator removed.
pub fn parse_record(line: &str) -> Record {
    let line = line.trim();
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Record::Skip;
    };
    let payload = payload.trim();
    if payload == DONE_SENTINEL {
        return Record::Done;
    }
    match serde_json::from_str::<ChatCompletion>(payload) {
        Ok(chunk) => match chunk.delta_text() {
            Some(text) if !text.is_empty() => Record::Delta(text.to_string()),
            _ => Record::Skip,
        },
        Err(e) => {
            debug!(payload_len = payload.len(), "skipping malformed stream record: {e}");
            Record::Skip
        },
    }
}

/// Growing text buffer split into records at `\n`.
#[derive(Debug, Default)]
pub struct RecordScanner {
    buf: String,
}

impl RecordScanner {
    pub fn push(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    /// Next complete record, without its terminator.
    pub fn next_line(&mut self) -> Option<String> {
        let idx = self.buf.find('\n')?;
        let mut line: String = self.buf.drain(..=idx).collect();
        line.pop();
        Some(line)
    }

    /// Bytes received after the last terminator.
    pub fn remainder(&self) -> &str {
        &self.buf
    }
}

/// Incremental UTF-8 decoding across chunk boundaries.
///
/// An incomplete trailing sequence is held until the next chunk; invalid
/// bytes are replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        loop {
            let (valid, invalid) = match std::str::from_utf8(&self.pending) {
                Ok(_) => (self.pending.len(), None),
                Err(e) => (e.valid_up_to(), e.error_len()),
            };
            out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
            match invalid {
                Some(n) => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    self.pending.drain(..valid + n);
                },
                None => {
                    self.pending.drain(..valid);
                    return out;
                },
            }
        }
    }

    /// Whatever is still held, decoded lossily.
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}
