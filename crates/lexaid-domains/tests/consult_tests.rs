mod support;

use anyhow::{bail, Result};
use lexaid_core::conversation::{ConversationBackend, ConversationStore, MemoryBackend};
use lexaid_core::{ChatMessage, Role, StreamEnd};
use lexaid_domains::consult::{Consultation, QUICK_PROMPTS, SYSTEM_PROMPT};
use support::StubBackend;
use tokio_util::sync::CancellationToken;

fn consultation(backend: MemoryBackend) -> Consultation<MemoryBackend> {
    Consultation::new(ConversationStore::load(backend).unwrap())
}

#[tokio::test]
async fn reply_streams_into_the_conversation() {
    let memory = MemoryBackend::with_messages(vec![
        ChatMessage::user("之前的问题"),
        ChatMessage::assistant("之前的回答"),
    ]);
    let mut c = consultation(memory.clone());
    let chat = StubBackend::streaming(vec!["可以", "申请", "仲裁"], StreamEnd::Done);

    let mut seen = Vec::new();
    let mut on_delta = |d: &str| seen.push(d.to_string());
    let end = c
        .send(&chat, QUICK_PROMPTS[0], &mut on_delta, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(end, StreamEnd::Done);
    assert_eq!(seen, vec!["可以", "申请", "仲裁"]);
    assert!(!c.store().is_streaming());
    let msgs = c.store().messages();
    assert_eq!(msgs.len(), 4);
    assert_eq!(msgs[3], ChatMessage::assistant("可以申请仲裁"));
    assert_eq!(memory.snapshot().unwrap(), msgs.to_vec());

    // System prompt first, then history and the new question, no placeholder.
    let (sent, _) = chat.last_call();
    assert_eq!(sent[0], ChatMessage::system(SYSTEM_PROMPT));
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[3], ChatMessage::user(QUICK_PROMPTS[0]));
    assert!(sent.iter().all(|m| !(m.role == Role::Assistant && m.content.is_empty())));
}

#[tokio::test]
async fn failed_stream_still_finishes() {
    let mut c = consultation(MemoryBackend::new());
    let chat = StubBackend {
        deltas: vec!["部分"],
        ..StubBackend::default()
    };
    let result = c
        .send(&chat, "问题", &mut |_: &str| {}, &CancellationToken::new())
        .await;
    assert!(result.is_err());
    assert!(!c.store().is_streaming());
    assert_eq!(c.store().messages()[1].content, "部分");

    // The conversation accepts the next question.
    let ok = StubBackend::streaming(vec!["好"], StreamEnd::Done);
    assert!(c.send(&ok, "再问", &mut |_: &str| {}, &CancellationToken::new()).await.is_ok());
}

#[tokio::test]
async fn cancelled_and_truncated_ends_are_not_errors() {
    let mut c = consultation(MemoryBackend::new());
    let chat = StubBackend::streaming(vec!["一半"], StreamEnd::Cancelled);
    let end = c.send(&chat, "问", &mut |_: &str| {}, &CancellationToken::new()).await.unwrap();
    assert_eq!(end, StreamEnd::Cancelled);
    assert_eq!(c.store().messages()[1].content, "一半");

    let chat = StubBackend::streaming(vec!["截断"], StreamEnd::Eof);
    let end = c.send(&chat, "再问", &mut |_: &str| {}, &CancellationToken::new()).await.unwrap();
    assert_eq!(end, StreamEnd::Eof);
}

#[tokio::test]
async fn blank_question_is_rejected_without_a_call() {
    let mut c = consultation(MemoryBackend::new());
    let chat = StubBackend::streaming(vec![], StreamEnd::Done);
    assert!(c.send(&chat, "  ", &mut |_: &str| {}, &CancellationToken::new()).await.is_err());
    assert_eq!(chat.call_count(), 0);
    assert!(c.store().is_empty());
}

#[tokio::test]
async fn clear_and_transcript() {
    let mut c = consultation(MemoryBackend::new());
    let chat = StubBackend::streaming(vec!["答"], StreamEnd::Done);
    c.send(&chat, "问", &mut |_: &str| {}, &CancellationToken::new()).await.unwrap();
    assert_eq!(c.transcript(), "用户：问\n\n助手：答");
    c.clear().unwrap();
    assert!(c.store().is_empty());
}

#[tokio::test]
async fn regenerate_replaces_the_last_reply() {
    let memory = MemoryBackend::with_messages(vec![
        ChatMessage::user("押金不退怎么办？"),
        ChatMessage::assistant("旧回答"),
    ]);
    let mut c = consultation(memory.clone());
    let chat = StubBackend::streaming(vec!["新", "回答"], StreamEnd::Done);
    let end = c.regenerate(&chat, &mut |_: &str| {}, &CancellationToken::new()).await.unwrap();

    assert_eq!(end, StreamEnd::Done);
    assert_eq!(
        c.store().messages(),
        [ChatMessage::user("押金不退怎么办？"), ChatMessage::assistant("新回答")]
    );
    assert_eq!(memory.snapshot().unwrap(), c.store().messages().to_vec());

    let (sent, _) = chat.last_call();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1], ChatMessage::user("押金不退怎么办？"));
}

#[tokio::test]
async fn regenerate_without_a_reply_makes_no_call() {
    let mut c = consultation(MemoryBackend::new());
    let chat = StubBackend::streaming(vec!["x"], StreamEnd::Done);
    assert!(c.regenerate(&chat, &mut |_: &str| {}, &CancellationToken::new()).await.is_err());
    assert_eq!(chat.call_count(), 0);
}

/// Saves the question but refuses the assistant placeholder.
struct RefusesPlaceholder;

impl ConversationBackend for RefusesPlaceholder {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>> {
        Ok(None)
    }

    fn save(&mut self, messages: &[ChatMessage]) -> Result<()> {
        if messages.last().is_some_and(|m| m.role == Role::Assistant) {
            bail!("disk full");
        }
        Ok(())
    }
}

#[tokio::test]
async fn failed_placeholder_save_does_not_lock_the_conversation() {
    let mut c = Consultation::new(ConversationStore::load(RefusesPlaceholder).unwrap());
    let chat = StubBackend::streaming(vec!["答"], StreamEnd::Done);
    let err = c
        .send(&chat, "问", &mut |_: &str| {}, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "disk full");
    assert_eq!(chat.call_count(), 0);
    assert!(!c.store().is_streaming());

    // The next question gets the same save error, not a busy refusal.
    let err = c
        .send(&chat, "再问", &mut |_: &str| {}, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "disk full");
}
