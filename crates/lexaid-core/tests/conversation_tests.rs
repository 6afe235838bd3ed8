use anyhow::{bail, Result};
use lexaid_core::conversation::{
    ConversationBackend, ConversationStore, FileBackend, MemoryBackend,
};
use lexaid_core::{ChatMessage, Role};

/// Refuses to save once the history would reach `fail_at` messages.
struct FullDisk {
    fail_at: usize,
    saved: Vec<ChatMessage>,
}

impl ConversationBackend for FullDisk {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>> {
        Ok(None)
    }

    fn save(&mut self, messages: &[ChatMessage]) -> Result<()> {
        if messages.len() >= self.fail_at {
            bail!("disk full");
        }
        self.saved = messages.to_vec();
        Ok(())
    }
}

fn full_disk(fail_at: usize) -> ConversationStore<FullDisk> {
    ConversationStore::load(FullDisk {
        fail_at,
        saved: Vec::new(),
    })
    .unwrap()
}

#[test]
fn streaming_reply_grows_the_last_message() {
    let backend = MemoryBackend::new();
    let mut store = ConversationStore::load(backend.clone()).unwrap();
    store.push_user("押金不退怎么办？").unwrap();
    store.begin_assistant().unwrap();
    store.append_delta("可以").unwrap();
    store.append_delta("协商").unwrap();
    store.finish_stream().unwrap();

    let msgs = store.messages();
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[1], ChatMessage::assistant("可以协商"));
    // Every mutation was flushed.
    assert_eq!(backend.snapshot().unwrap(), msgs.to_vec());
}

#[test]
fn send_is_refused_while_streaming() {
    let mut store = ConversationStore::load(MemoryBackend::new()).unwrap();
    store.push_user("q1").unwrap();
    store.begin_assistant().unwrap();
    assert!(store.is_streaming());
    assert!(store.push_user("q2").is_err());
    assert!(store.begin_assistant().is_err());
    store.finish_stream().unwrap();
    assert!(store.push_user("q2").is_ok());
}

#[test]
fn empty_input_is_rejected() {
    let mut store = ConversationStore::load(MemoryBackend::new()).unwrap();
    assert!(store.push_user("   ").is_err());
    assert!(store.is_empty());
}

#[test]
fn delta_without_stream_is_an_error() {
    let mut store = ConversationStore::load(MemoryBackend::new()).unwrap();
    assert!(store.append_delta("x").is_err());
}

#[test]
fn clear_empties_and_flushes() {
    let backend = MemoryBackend::with_messages(vec![ChatMessage::user("a")]);
    let mut store = ConversationStore::load(backend.clone()).unwrap();
    assert_eq!(store.messages().len(), 1);
    store.clear().unwrap();
    assert!(store.is_empty());
    assert_eq!(backend.snapshot(), Some(Vec::new()));
}

#[test]
fn transcript_skips_system_messages() {
    let backend = MemoryBackend::with_messages(vec![
        ChatMessage::system("hidden"),
        ChatMessage::user("问"),
        ChatMessage::assistant("答"),
    ]);
    let store = ConversationStore::load(backend).unwrap();
    assert_eq!(store.transcript(), "用户：问\n\n助手：答");
}

#[test]
fn file_backend_round_trips_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("consult_messages_v1.json");

    let mut store = ConversationStore::load(FileBackend::new(&path)).unwrap();
    assert!(store.is_empty());
    store.push_user("hello").unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw, r#"[{"role":"user","content":"hello"}]"#);

    let restored = ConversationStore::load(FileBackend::new(&path)).unwrap();
    assert_eq!(restored.messages()[0].role, Role::User);
    assert_eq!(restored.messages()[0].content, "hello");
}

#[test]
fn corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("c.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(ConversationStore::load(FileBackend::new(&path)).is_err());
}

#[test]
fn failed_placeholder_save_leaves_the_store_usable() {
    let mut store = full_disk(2);
    store.push_user("q1").unwrap();
    let err = store.begin_assistant().unwrap_err();
    assert_eq!(err.to_string(), "disk full");
    assert!(!store.is_streaming());
    assert_eq!(store.messages(), [ChatMessage::user("q1")]);
    assert_eq!(store.backend().saved, [ChatMessage::user("q1")]);
}

#[test]
fn failed_user_save_is_rolled_back() {
    let mut store = full_disk(1);
    assert!(store.push_user("q1").is_err());
    assert!(store.is_empty());
    assert!(!store.is_streaming());
}

#[test]
fn drop_last_reply_returns_the_question() {
    let backend = MemoryBackend::with_messages(vec![
        ChatMessage::user("问"),
        ChatMessage::assistant("答"),
    ]);
    let mut store = ConversationStore::load(backend.clone()).unwrap();
    assert_eq!(store.drop_last_reply().unwrap(), "问");
    assert_eq!(backend.snapshot().unwrap(), [ChatMessage::user("问")]);
    // The last message is now the question, not a reply.
    assert!(store.drop_last_reply().is_err());
}

#[test]
fn drop_last_reply_is_refused_while_streaming() {
    let mut store = ConversationStore::load(MemoryBackend::new()).unwrap();
    store.push_user("q").unwrap();
    store.begin_assistant().unwrap();
    assert!(store.drop_last_reply().is_err());
    assert_eq!(store.messages().len(), 2);
}
