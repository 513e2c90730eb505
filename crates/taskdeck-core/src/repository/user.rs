//! UserRepository trait definition.

use taskdeck_types::error::RepositoryError;
use taskdeck_types::user::User;
use uuid::Uuid;

/// Repository trait for the locally mirrored user records.
pub trait UserRepository: Send + Sync {
    /// Insert or update a user record (identity comes from the auth proxy).
    fn upsert_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a user by ID.
    fn get_user(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
