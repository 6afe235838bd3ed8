use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::types::{ChatMessage, ChatOptions, StreamEnd};

/// A chat-completion provider as seen by the feature modules.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Single request/response; returns the assistant text.
    async fn chat_once(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Result<String>;

    /// Streams the reply, calling `on_delta` once per non-empty fragment in
    /// arrival order. Cancelling `cancel` ends the call with `StreamEnd::Cancelled`.
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
        on_delta: &mut (dyn for<'d> FnMut(&'d str) + Send),
        cancel: &CancellationToken,
    ) -> Result<StreamEnd>;
}
