use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::types::{ChatMessage, Role};

/// Where a conversation lives between runs.
pub trait ConversationBackend: Send {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<ChatMessage>>>;
    fn save(&mut self, messages: &[ChatMessage]) -> Result<()>;
}

/// Volatile backend. Clones share the same slot, so a test can keep a handle
/// and observe what the store flushed.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<Vec<ChatMessage>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(messages))),
        }
    }

    pub fn snapshot(&self) -> Option<Vec<ChatMessage>> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }
}

impl ConversationBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>> {
        Ok(self.snapshot())
    }

    fn save(&mut self, messages: &[ChatMessage]) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(messages.to_vec());
        }
        Ok(())
    }
}

/// Plain JSON array on disk, no schema versioning.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationBackend for FileBackend {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()))
            },
        };
        let messages = serde_json::from_str(&raw)
            .with_context(|| format!("parsing conversation in {}", self.path.display()))?;
        Ok(Some(messages))
    }

    fn save(&mut self, messages: &[ChatMessage]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("creating {}", dir.display()))?;
            }
        }
        let json = serde_json::to_string(messages)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

/// A consultation history with an explicit lifecycle.
///
/// Mutations go through `push_user`, `begin_assistant`, `append_delta`,
/// `finish_stream` and `clear`; each one is flushed to the backend before
/// returning. While a stream is active the in-progress assistant message is
/// always the last element and `push_user` is refused.
pub struct ConversationStore<B: ConversationBackend> {
    messages: Vec<ChatMessage>,
    streaming: bool,
    backend: B,
}

impl<B: ConversationBackend> ConversationStore<B> {
    /// Restore from the backend, or start empty if it holds nothing.
    pub fn load(backend: B) -> Result<Self> {
        let messages = backend.load()?.unwrap_or_default();
        debug!(count = messages.len(), "conversation restored");
        Ok(Self {
            messages,
            streaming: false,
            backend,
        })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, text: &str) -> Result<()> {
        if self.streaming {
            bail!("a reply is still being generated");
        }
        let text = text.trim();
        if text.is_empty() {
            bail!("message is empty");
        }
        self.messages.push(ChatMessage::user(text));
        self.flush_or_pop()
    }

    /// Append the empty assistant placeholder and mark the stream active.
    ///
    /// Nothing changes if the placeholder cannot be saved.
    pub fn begin_assistant(&mut self) -> Result<()> {
        if self.streaming {
            bail!("a reply is still being generated");
        }
        self.messages.push(ChatMessage::assistant(String::new()));
        self.flush_or_pop()?;
        self.streaming = true;
        Ok(())
    }

    /// Drop the trailing assistant reply so the last user turn can be asked
    /// again. Returns that user turn's text.
    pub fn drop_last_reply(&mut self) -> Result<String> {
        if self.streaming {
            bail!("a reply is still being generated");
        }
        let question = match self.messages.as_slice() {
            [.., q, a] if q.role == Role::User && a.role == Role::Assistant => q.content.clone(),
            _ => bail!("no reply to regenerate"),
        };
        if let Some(reply) = self.messages.pop() {
            if let Err(e) = self.flush() {
                self.messages.push(reply);
                return Err(e);
            }
        }
        Ok(question)
    }

    /// Grow the in-progress assistant message.
    pub fn append_delta(&mut self, delta: &str) -> Result<()> {
        if !self.streaming {
            bail!("no reply in progress");
        }
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Assistant => last.content.push_str(delta),
            _ => bail!("in-progress reply is not the last message"),
        }
        self.flush()
    }

    pub fn finish_stream(&mut self) -> Result<()> {
        self.streaming = false;
        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.messages.clear();
        self.streaming = false;
        self.flush()
    }

    /// Text for "copy conversation": user/assistant turns only.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .filter_map(|m| match m.role {
                Role::System => None,
                Role::User => Some(format!("用户：{}", m.content)),
                Role::Assistant => Some(format!("助手：{}", m.content)),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn flush(&mut self) -> Result<()> {
        self.backend.save(&self.messages)
    }

    /// Flush after a push, undoing the push when the save fails.
    fn flush_or_pop(&mut self) -> Result<()> {
        let saved = self.flush();
        if saved.is_err() {
            self.messages.pop();
        }
        saved
    }
}
