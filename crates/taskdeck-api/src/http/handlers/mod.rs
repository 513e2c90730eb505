//! HTTP request handlers, grouped by resource.

pub mod chat;
pub mod conversation;
pub mod message;
pub mod task;
pub mod user;
