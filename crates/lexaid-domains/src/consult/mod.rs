//! Multi-turn consultation over a persisted conversation.

use anyhow::Result;
use lexaid_core::{
    agent::ChatBackend,
    conversation::{ConversationBackend, ConversationStore},
    ChatMessage, ChatOptions, StreamEnd,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const SYSTEM_PROMPT: &str = "你是一名专业的法律咨询助手，请使用 Markdown 输出（如 # 标题、- 列表、**加粗**、引用等），用通俗中文、结构化分点回答。若问题复杂或高风险，请提醒咨询执业律师，并在末尾给出相关法律依据（如有）。";

pub const QUICK_PROMPTS: &[&str] = &[
    "劳动合同纠纷如何维权？",
    "租房押金不退怎么办？",
    "电商退款被拒如何申诉？",
    "交通事故责任如何划分？",
];

pub struct Consultation<B: ConversationBackend> {
    store: ConversationStore<B>,
    opts: ChatOptions,
}

impl<B: ConversationBackend> Consultation<B> {
    pub fn new(store: ConversationStore<B>) -> Self {
        Self {
            store,
            opts: ChatOptions::default(),
        }
    }

    pub fn with_options(mut self, opts: ChatOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn store(&self) -> &ConversationStore<B> {
        &self.store
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }

    pub fn transcript(&self) -> String {
        self.store.transcript()
    }

    /// What goes on the wire: the system prompt, then the stored turns
    /// (excluding the in-progress placeholder).
    fn request_messages(&self) -> Vec<ChatMessage> {
        let history = self.store.messages();
        let history = if self.store.is_streaming() {
            &history[..history.len().saturating_sub(1)]
        } else {
            history
        };
        std::iter::once(ChatMessage::system(SYSTEM_PROMPT))
            .chain(history.iter().filter(|m| m.role != lexaid_core::Role::System).cloned())
            .collect()
    }

    /// Send `text` and stream the reply into the conversation.
    ///
    /// `on_delta` sees each fragment after it has been stored. The stream is
    /// marked finished on every outcome, errors included; fragments already
    /// stored stay.
    pub async fn send(
        &mut self,
        backend: &dyn ChatBackend,
        text: &str,
        on_delta: &mut (dyn for<'d> FnMut(&'d str) + Send),
        cancel: &CancellationToken,
    ) -> Result<StreamEnd> {
        self.store.push_user(text)?;
        self.stream_reply(backend, on_delta, cancel).await
    }

    /// Drop the last assistant reply and ask its question again.
    pub async fn regenerate(
        &mut self,
        backend: &dyn ChatBackend,
        on_delta: &mut (dyn for<'d> FnMut(&'d str) + Send),
        cancel: &CancellationToken,
    ) -> Result<StreamEnd> {
        let question = self.store.drop_last_reply()?;
        info!(question_len = question.len(), "regenerating last reply");
        self.stream_reply(backend, on_delta, cancel).await
    }

    async fn stream_reply(
        &mut self,
        backend: &dyn ChatBackend,
        on_delta: &mut (dyn for<'d> FnMut(&'d str) + Send),
        cancel: &CancellationToken,
    ) -> Result<StreamEnd> {
        if let Err(e) = self.store.begin_assistant() {
            if self.store.is_streaming() {
                self.store.finish_stream()?;
            }
            return Err(e);
        }
        let messages = self.request_messages();
        info!(turns = messages.len(), "sending consultation turn");

        let store = &mut self.store;
        let mut store_error = None;
        let result = backend
            .chat_stream(
                &messages,
                &self.opts,
                &mut |delta: &str| {
                    if store_error.is_some() {
                        return;
                    }
                    match store.append_delta(delta) {
                        Ok(()) => on_delta(delta),
                        Err(e) => store_error = Some(e),
                    }
                },
                cancel,
            )
            .await;

        let finished = self.store.finish_stream();
        if let Err(e) = &result {
            warn!("consultation stream failed: {e:#}");
        }
        let end = result?;
        if let Some(e) = store_error {
            return Err(e);
        }
        finished?;
        if end == StreamEnd::Eof {
            warn!("consultation reply may be truncated");
        }
        Ok(end)
    }
}
