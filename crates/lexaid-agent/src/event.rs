use lexaid_core::ChatMessage;
use serde::{Deserialize, Serialize};

/// Body posted to the gateway's chat-completions route.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

/// A completion or a stream chunk. Every field is optional on the wire, so a
/// record that is valid JSON but has an unexpected shape decodes to "no text".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    pub message: Option<Content>,
    pub delta: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Content {
    pub content: Option<String>,
}

impl ChatCompletion {
    /// `choices[0].message.content`
    pub fn message_text(&self) -> Option<&str> {
        self.choices.first()?.message.as_ref()?.content.as_deref()
    }

    /// `choices[0].delta.content`
    pub fn delta_text(&self) -> Option<&str> {
        self.choices.first()?.delta.as_ref()?.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_unset_fields() {
        let msgs = [ChatMessage::user("hi")];
        let one_shot = ChatRequest {
            model: "m",
            messages: &msgs,
            temperature: Some(0.5),
            stream: false,
        };
        assert_eq!(
            serde_json::to_string(&one_shot).unwrap(),
            r#"{"model":"m","messages":[{"role":"user","content":"hi"}],"temperature":0.5}"#
        );
        let streaming = ChatRequest {
            temperature: None,
            stream: true,
            ..one_shot
        };
        assert_eq!(
            serde_json::to_string(&streaming).unwrap(),
            r#"{"model":"m","messages":[{"role":"user","content":"hi"}],"stream":true}"#
        );
    }

    #[test]
    fn odd_shapes_decode_to_no_text() {
        let c: ChatCompletion = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(c.message_text(), None);
        let c: ChatCompletion = serde_json::from_str(r#"{"choices":[{"delta":{}}]}"#).unwrap();
        assert_eq!(c.delta_text(), None);
    }
}
