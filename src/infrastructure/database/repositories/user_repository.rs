use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::prelude::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use super::token_repository::{insert_token, token_model_to_domain};
use crate::domain::{
    AuthToken, CreateUserDto, DomainError, DomainResult, FieldErrors, GetUserDto, UpdateUserDto,
    User, UserAccount, UserProfile, UserRepositoryInterface, UserSortField, Visibility,
};
use crate::domain::user::{EMAIL_TAKEN, USERNAME_TAKEN};
use crate::infrastructure::database::entities::{user, user_profile};
use crate::shared::PaginatedResult;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        first_name: model.first_name,
        last_name: model.last_name,
        is_active: model.is_active,
        is_staff: model.is_staff,
        is_superuser: model.is_superuser,
        date_joined: model.date_joined,
        last_login: model.last_login,
    }
}

pub(super) fn profile_model_to_domain(model: user_profile::Model) -> UserProfile {
    UserProfile {
        id: model.id,
        user_id: model.user_id,
        phone: model.phone,
        birth_date: model.birth_date,
        bio: model.bio,
        avatar: model.avatar,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn account_from_models(
    user: user::Model,
    profile: Option<user_profile::Model>,
) -> DomainResult<UserAccount> {
    let Some(profile) = profile else {
        return Err(DomainError::NotFound {
            entity: "UserProfile",
            field: "user_id",
            value: user.id,
        });
    };
    Ok(UserAccount {
        user: user_model_to_domain(user),
        profile: profile_model_to_domain(profile),
    })
}

/// Translate a unique-constraint violation on `users` into field errors.
fn unique_violation(e: &DbErr) -> Option<FieldErrors> {
    let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() else {
        return None;
    };
    let mut errors = FieldErrors::new();
    if msg.contains("username") {
        errors.add("username", USERNAME_TAKEN);
    }
    if msg.contains("email") {
        errors.add("email", EMAIL_TAKEN);
    }
    (!errors.is_empty()).then_some(errors)
}

fn write_err(e: DbErr) -> DomainError {
    match unique_violation(&e) {
        Some(errors) => DomainError::Validation(errors),
        None => DomainError::from(e),
    }
}

async fn insert_user<C: ConnectionTrait>(
    conn: &C,
    dto: CreateUserDto,
    now: DateTime<Utc>,
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(dto.username),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        first_name: Set(dto.first_name),
        last_name: Set(dto.last_name),
        is_active: Set(true),
        is_staff: Set(dto.is_staff),
        is_superuser: Set(dto.is_superuser),
        date_joined: Set(now),
        last_login: Set(None),
    }
    .insert(conn)
    .await
}

async fn insert_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<user_profile::Model, DbErr> {
    let blank = UserProfile::blank(user_id, now);
    user_profile::ActiveModel {
        id: Set(blank.id),
        user_id: Set(blank.user_id),
        phone: Set(blank.phone),
        birth_date: Set(blank.birth_date),
        bio: Set(blank.bio),
        avatar: Set(blank.avatar),
        is_active: Set(blank.is_active),
        created_at: Set(blank.created_at),
        updated_at: Set(blank.updated_at),
    }
    .insert(conn)
    .await
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn create_account(
        &self,
        dto: CreateUserDto,
        token_key: String,
    ) -> DomainResult<(UserAccount, AuthToken)> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        // Dropping `txn` on an early return rolls everything back.
        let user = insert_user(&txn, dto, now).await.map_err(write_err)?;
        let profile = insert_profile(&txn, &user.id, now).await?;
        let token = insert_token(&txn, &user.id, token_key, now).await?;

        txn.commit().await?;
        debug!(user_id = %user.id, "Account rows committed");

        Ok((
            UserAccount {
                user: user_model_to_domain(user),
                profile: profile_model_to_domain(profile),
            },
            token_model_to_domain(token),
        ))
    }

    async fn list_accounts(&self, dto: GetUserDto) -> DomainResult<PaginatedResult<UserAccount>> {
        let mut query = user::Entity::find();

        if let Visibility::OwnOnly(ref id) = dto.visibility {
            query = query.filter(user::Column::Id.eq(id.as_str()));
        }

        if let Some(ref search) = dto.search {
            query = query.filter(
                user::Column::Username
                    .contains(search)
                    .or(user::Column::Email.contains(search)),
            );
        }

        query = match dto.sort_by {
            UserSortField::Username => query.order_by_asc(user::Column::Username),
            UserSortField::Email => query.order_by_asc(user::Column::Email),
            UserSortField::DateJoined => query.order_by_desc(user::Column::DateJoined),
        };

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .find_also_related(user_profile::Entity)
            .offset(dto.page.offset())
            .limit(u64::from(dto.page.limit))
            .all(&self.db)
            .await?;

        let items = rows
            .into_iter()
            .map(|(user, profile)| account_from_models(user, profile))
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(PaginatedResult::new(items, total, dto.page))
    }

    async fn get_account(&self, id: &str) -> DomainResult<Option<UserAccount>> {
        let row = user::Entity::find_by_id(id)
            .find_also_related(user_profile::Entity)
            .one(&self.db)
            .await?;

        row.map(|(user, profile)| account_from_models(user, profile))
            .transpose()
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn update_user(&self, id: &str, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let Some(existing) = user::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        if let Some(username) = dto.username {
            active.username = Set(username);
        }
        if let Some(email) = dto.email {
            active.email = Set(email);
        }
        if let Some(first_name) = dto.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = dto.last_name {
            active.last_name = Set(last_name);
        }

        let updated = active.update(&self.db).await.map_err(write_err)?;
        Ok(Some(user_model_to_domain(updated)))
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLogin, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn set_active(&self, id: &str, is_active: bool) -> DomainResult<()> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsActive, Expr::value(is_active))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }
        Ok(())
    }
}
