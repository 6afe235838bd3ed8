use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use lexaid_core::{
    agent::ChatBackend, config::Config, ChatMessage, ChatOptions, StreamEnd, DEFAULT_MODEL,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::event::{ChatCompletion, ChatRequest};
use crate::sse::{self, Record, RecordScanner, Utf8Decoder};

pub const CHAT_PATH: &str = "/api/chat-completions";
pub const HEALTH_PATH: &str = "/api/health";

/// Talks to the lexaid gateway, which holds the upstream credential.
pub struct ChatClient {
    pub base_url: String,
    /// Used when a call does not name a model.
    pub model: String,
    http: reqwest::Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("building http client")?;
        Ok(Self {
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = Self::new(config.gateway_url.clone())?;
        client.model = config.model.clone();
        Ok(client)
    }

    fn model_for<'a>(&'a self, opts: &'a ChatOptions) -> &'a str {
        opts.model.as_deref().unwrap_or(&self.model)
    }

    fn endpoint(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url.trim_end_matches('/'))
    }

    pub async fn health(&self) -> Result<()> {
        let url = format!("{}{HEALTH_PATH}", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("gateway health check")?;
        if !response.status().is_success() {
            bail!("HTTP {}", response.status().as_u16());
        }
        Ok(())
    }

    /// Send the streaming request and hand back a reader over its body.
    ///
    /// Fails on a non-success status. Cancelling `cancel` ends the reader at
    /// its next read.
    pub async fn open_stream(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
        cancel: CancellationToken,
    ) -> Result<ChatStream> {
        let body = ChatRequest {
            model: self.model_for(opts),
            messages,
            temperature: opts.temperature,
            stream: true,
        };
        info!(model = %body.model, messages = messages.len(), "opening chat stream");

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("sending chat stream request")?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "chat stream rejected");
            bail!("HTTP {}", status.as_u16());
        }
        Ok(ChatStream::new(response, cancel))
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn chat_once(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Result<String> {
        let body = ChatRequest {
            model: self.model_for(opts),
            messages,
            temperature: Some(opts.temperature_or_default()),
            stream: false,
        };
        info!(model = %body.model, messages = messages.len(), "chat request");

        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .context("sending chat request")?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "chat request rejected");
            bail!("HTTP {}", status.as_u16());
        }

        let completion: ChatCompletion =
            response.json().await.context("decoding chat response")?;
        let text = completion.message_text().unwrap_or_default().to_string();
        if text.is_empty() {
            warn!("chat response carried no assistant text");
        }
        debug!(output_len = text.len(), "chat response received");
        Ok(text)
    }

    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
        on_delta: &mut (dyn for<'d> FnMut(&'d str) + Send),
        cancel: &CancellationToken,
    ) -> Result<StreamEnd> {
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            stream = self.open_stream(messages, opts, cancel.clone()) => Some(stream),
        };
        let Some(stream) = opened else {
            debug!("chat stream cancelled before response");
            return Ok(StreamEnd::Cancelled);
        };
        let mut stream = stream?;
        loop {
            match stream.next_event().await? {
                StreamEvent::Delta(text) => on_delta(&text),
                StreamEvent::End(end) => return Ok(end),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    End(StreamEnd),
}

/// Pull-based reader over a streaming chat response.
///
/// Each call to [`next_event`](Self::next_event) yields the next non-empty
/// fragment in arrival order, or the way the stream ended. Once ended it keeps
/// returning the same `End`.
pub struct ChatStream {
    response: reqwest::Response,
    decoder: Utf8Decoder,
    scanner: RecordScanner,
    cancel: CancellationToken,
    end: Option<StreamEnd>,
    deltas: usize,
}

impl ChatStream {
    fn new(response: reqwest::Response, cancel: CancellationToken) -> Self {
        Self {
            response,
            decoder: Utf8Decoder::default(),
            scanner: RecordScanner::default(),
            cancel,
            end: None,
            deltas: 0,
        }
    }

    pub async fn next_event(&mut self) -> Result<StreamEvent> {
        loop {
            if let Some(end) = self.end {
                return Ok(StreamEvent::End(end));
            }
            if self.cancel.is_cancelled() {
                self.stop(StreamEnd::Cancelled);
                continue;
            }

            while let Some(line) = self.scanner.next_line() {
                match sse::parse_record(&line) {
                    Record::Delta(text) => {
                        self.deltas += 1;
                        return Ok(StreamEvent::Delta(text));
                    },
                    Record::Done => {
                        self.stop(StreamEnd::Done);
                        return Ok(StreamEvent::End(StreamEnd::Done));
                    },
                    Record::Skip => {},
                }
            }

            let read = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => None,
                chunk = self.response.chunk() => Some(chunk),
            };
            let Some(chunk) = read else {
                self.stop(StreamEnd::Cancelled);
                continue;
            };
            match chunk.context("reading chat stream")? {
                Some(bytes) => {
                    let text = self.decoder.push(&bytes);
                    self.scanner.push(&text);
                },
                None => {
                    let tail = self.decoder.finish();
                    self.scanner.push(&tail);
                    if !self.scanner.remainder().trim().is_empty() {
                        debug!(
                            tail_len = self.scanner.remainder().len(),
                            "dropping unterminated final record"
                        );
                    }
                    warn!(deltas = self.deltas, "chat stream ended without [DONE]");
                    self.stop(StreamEnd::Eof);
                },
            }
        }
    }

    fn stop(&mut self, end: StreamEnd) {
        debug!(?end, deltas = self.deltas, "chat stream finished");
        self.end = Some(end);
    }
}
