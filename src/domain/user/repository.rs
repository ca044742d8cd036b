use async_trait::async_trait;

use super::{CreateUserDto, GetUserDto, UpdateProfileDto, UpdateUserDto, User, UserAccount, UserProfile};
use crate::domain::token::AuthToken;
use crate::domain::DomainResult;
use crate::shared::PaginatedResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert the identity, its blank profile and its token in one
    /// transaction. Nothing is persisted when any step fails.
    async fn create_account(
        &self,
        dto: CreateUserDto,
        token_key: String,
    ) -> DomainResult<(UserAccount, AuthToken)>;

    async fn list_accounts(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<UserAccount>>;
    async fn get_account(&self, id: &str) -> DomainResult<Option<UserAccount>>;

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn count_users(&self) -> DomainResult<u64>;

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>>;
    async fn record_login(&self, id: &str) -> DomainResult<()>;
    async fn set_active(&self, id: &str, is_active: bool) -> DomainResult<()>;
}

#[async_trait]
pub trait ProfileRepositoryInterface: Send + Sync {
    /// Apply a partial update to the profile owned by `user_id`.
    async fn update_profile(
        &self,
        user_id: &str,
        dto: UpdateProfileDto,
    ) -> DomainResult<Option<UserProfile>>;
}
