pub mod client;
pub mod event;
pub mod sse;

pub use client::{ChatClient, ChatStream, StreamEvent};
