//! Repository access for the domain layer
//!
//! - `RepositoryProvider`: unified access to the per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use super::token::TokenRepositoryInterface;
use super::user::{ProfileRepositoryInterface, UserRepositoryInterface};
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().get_user_by_username("alice").await?;
///     let token = repos.tokens().find_by_user(&user.id).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepositoryInterface;
    fn profiles(&self) -> &dyn ProfileRepositoryInterface;
    fn tokens(&self) -> &dyn TokenRepositoryInterface;
}
