//! Browser → server messages.

pub mod messages;
