//! Acting-user extractor.
//!
//! The service sits behind an authenticating proxy that verifies the caller
//! and forwards their identity in headers:
//! - `X-User-Id` — UUID, required
//! - `X-User-Email` — required
//! - `X-User-Name` — optional, falls back to the email
//!
//! Extracting [`RequestUser`] upserts the user row so foreign-key anchors
//! (tasks, categories, conversations) always resolve.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use taskdeck_core::repository::UserRepository;
use taskdeck_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// The verified acting user, mirrored into the local users table.
pub struct RequestUser(pub User);

impl FromRequestParts<AppState> for RequestUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = required_header(parts, "x-user-id")?;
        let id: Uuid = id.parse().map_err(|_| {
            AppError::Unauthorized("X-User-Id header is not a valid UUID".to_string())
        })?;

        let email = required_header(parts, "x-user-email")?;
        let display_name = optional_header(parts, "x-user-name")?.unwrap_or_else(|| email.clone());

        let user = User {
            id,
            email,
            display_name,
            is_active: true,
        };

        state.user_repo.upsert_user(&user).await?;

        Ok(RequestUser(user))
    }
}

fn required_header(parts: &Parts, name: &str) -> Result<String, AppError> {
    optional_header(parts, name)?
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {name} header")))
}

fn optional_header(parts: &Parts, name: &str) -> Result<Option<String>, AppError> {
    match parts.headers.get(name) {
        Some(value) => {
            let s = value
                .to_str()
                .map_err(|_| AppError::Unauthorized(format!("Invalid {name} header encoding")))?
                .trim();
            if s.is_empty() {
                Ok(None)
            } else {
                Ok(Some(s.to_string()))
            }
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_required_header_present() {
        let parts = parts_with_headers(&[("x-user-email", "a@example.com")]);
        assert_eq!(
            required_header(&parts, "x-user-email").unwrap(),
            "a@example.com"
        );
    }

    #[test]
    fn test_required_header_missing_or_blank() {
        let parts = parts_with_headers(&[]);
        assert!(required_header(&parts, "x-user-id").is_err());

        let parts = parts_with_headers(&[("x-user-id", "   ")]);
        assert!(required_header(&parts, "x-user-id").is_err());
    }

    #[test]
    fn test_optional_header_absent_is_none() {
        let parts = parts_with_headers(&[]);
        assert!(optional_header(&parts, "x-user-name").unwrap().is_none());
    }
}
