//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{ProfileRepositoryInterface, TokenRepositoryInterface, UserRepositoryInterface};

use super::profile_repository::SeaOrmProfileRepository;
use super::token_repository::SeaOrmTokenRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let user = repos.users().get_user_by_username("alice").await?;
/// let token = repos.tokens().find_by_user(&user.id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    profiles: SeaOrmProfileRepository,
    tokens: SeaOrmTokenRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            profiles: SeaOrmProfileRepository::new(db.clone()),
            tokens: SeaOrmTokenRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepositoryInterface {
        &self.users
    }

    fn profiles(&self) -> &dyn ProfileRepositoryInterface {
        &self.profiles
    }

    fn tokens(&self) -> &dyn TokenRepositoryInterface {
        &self.tokens
    }
}
