//! HTTP surface: router, error mapping, extractors, handlers.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
