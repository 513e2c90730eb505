//! User identity record.
//!
//! Authentication lives with the upstream auth provider; taskdeck only
//! mirrors the resolved identity locally so ownership references resolve.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as resolved by the upstream auth provider.
///
/// Read-only from the assistant pipeline's point of view: taskdeck upserts
/// this record from proxy headers and never mutates it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub is_active: bool,
}
