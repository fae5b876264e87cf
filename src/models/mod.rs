//! Data models for workspace entities

mod conversation;
mod embed;
mod message;

pub use conversation::*;
pub use embed::*;
pub use message::*;
