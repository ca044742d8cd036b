use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr,
};
use tracing::debug;

use crate::domain::{AuthToken, DomainError, DomainResult, TokenRepositoryInterface};
use crate::infrastructure::database::entities::auth_token;

pub struct SeaOrmTokenRepository {
    db: DatabaseConnection,
}

impl SeaOrmTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn token_model_to_domain(model: auth_token::Model) -> AuthToken {
    AuthToken {
        key: model.key,
        user_id: model.user_id,
        created_at: model.created_at,
    }
}

pub(super) async fn insert_token<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    key: String,
    now: DateTime<Utc>,
) -> Result<auth_token::Model, DbErr> {
    auth_token::ActiveModel {
        key: Set(key),
        user_id: Set(user_id.to_string()),
        created_at: Set(now),
    }
    .insert(conn)
    .await
}

#[async_trait]
impl TokenRepositoryInterface for SeaOrmTokenRepository {
    async fn get_or_create(&self, user_id: &str, candidate_key: String) -> DomainResult<AuthToken> {
        if let Some(existing) = self.find_by_user(user_id).await? {
            return Ok(existing);
        }

        match insert_token(&self.db, user_id, candidate_key, Utc::now()).await {
            Ok(model) => Ok(token_model_to_domain(model)),
            // Lost the race against a concurrent login: the unique key on
            // user_id rejected our row, so the winner's token is the one.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!(user_id, "Token insert raced, re-reading");
                self.find_by_user(user_id)
                    .await?
                    .ok_or_else(|| DomainError::from(e))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_key(&self, key: &str) -> DomainResult<Option<AuthToken>> {
        let model = auth_token::Entity::find_by_id(key).one(&self.db).await?;
        Ok(model.map(token_model_to_domain))
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Option<AuthToken>> {
        let model = auth_token::Entity::find()
            .filter(auth_token::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(model.map(token_model_to_domain))
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<bool> {
        let result = auth_token::Entity::delete_many()
            .filter(auth_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
