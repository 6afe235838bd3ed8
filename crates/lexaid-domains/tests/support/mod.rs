#![allow(dead_code)]

use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use lexaid_core::agent::ChatBackend;
use lexaid_core::{ChatMessage, ChatOptions, StreamEnd};
use tokio_util::sync::CancellationToken;

/// Scripted backend that records every call.
#[derive(Default)]
pub struct StubBackend {
    pub once_reply: Option<String>,
    pub deltas: Vec<&'static str>,
    pub stream_end: Option<StreamEnd>,
    pub calls: Mutex<Vec<(Vec<ChatMessage>, ChatOptions)>>,
}

impl StubBackend {
    pub fn replying(text: &str) -> Self {
        Self {
            once_reply: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn streaming(deltas: Vec<&'static str>, end: StreamEnd) -> Self {
        Self {
            deltas,
            stream_end: Some(end),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> (Vec<ChatMessage>, ChatOptions) {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ChatBackend for StubBackend {
    async fn chat_once(&self, messages: &[ChatMessage], opts: &ChatOptions) -> Result<String> {
        self.calls.lock().unwrap().push((messages.to_vec(), opts.clone()));
        match &self.once_reply {
            Some(text) => Ok(text.clone()),
            None => bail!("HTTP 500"),
        }
    }

    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        opts: &ChatOptions,
        on_delta: &mut (dyn for<'d> FnMut(&'d str) + Send),
        _cancel: &CancellationToken,
    ) -> Result<StreamEnd> {
        self.calls.lock().unwrap().push((messages.to_vec(), opts.clone()));
        for d in &self.deltas {
            on_delta(d);
        }
        match self.stream_end {
            Some(end) => Ok(end),
            None => bail!("HTTP 502"),
        }
    }
}
