use serde::{Deserialize, Serialize};

/// Model used when the caller does not name one.
pub const DEFAULT_MODEL: &str = "THUDM/GLM-4-9B-0414";

/// Sampling temperature for one-shot calls without an explicit value.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

// ── Chat ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation. Position in the sequence is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Per-call overrides. `None` falls back to [`DEFAULT_MODEL`] / [`DEFAULT_TEMPERATURE`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl ChatOptions {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            model: None,
            temperature: Some(temperature),
        }
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }
}

/// How a streaming call ended. None of these is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamEnd {
    /// The `[DONE]` sentinel arrived.
    Done,
    /// The byte stream closed before any sentinel; the reply may be truncated.
    Eof,
    /// The caller cancelled; deltas already delivered stay applied.
    Cancelled,
}

impl StreamEnd {
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Done)
    }
}
