use async_trait::async_trait;

use super::AuthToken;
use crate::domain::DomainResult;

#[async_trait]
pub trait TokenRepositoryInterface: Send + Sync {
    /// Return the identity's token, inserting one with `candidate_key` when
    /// none exists. Concurrent callers for the same identity all end up with
    /// the same token.
    async fn get_or_create(&self, user_id: &str, candidate_key: String) -> DomainResult<AuthToken>;

    async fn find_by_key(&self, key: &str) -> DomainResult<Option<AuthToken>>;
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Option<AuthToken>>;

    /// Returns `false` when the identity had no token.
    async fn delete_for_user(&self, user_id: &str) -> DomainResult<bool>;
}
