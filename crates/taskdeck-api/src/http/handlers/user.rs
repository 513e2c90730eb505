//! User handler.
//!
//! GET /api/users/me — return the acting user. The [`RequestUser`]
//! extractor has already mirrored the proxy identity into the users table.

use axum::Json;

use taskdeck_types::user::User;

use crate::http::extractors::auth::RequestUser;

/// GET /api/users/me - The acting user, as mirrored locally.
pub async fn me(RequestUser(user): RequestUser) -> Json<User> {
    Json(user)
}
