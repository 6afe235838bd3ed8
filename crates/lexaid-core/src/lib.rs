pub mod agent;
pub mod compliance;
pub mod config;
pub mod conversation;
pub mod convert;
pub mod export;
pub mod html;
pub mod types;

pub use types::*;
