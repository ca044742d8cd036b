use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::user_repository::profile_model_to_domain;
use crate::domain::{DomainResult, ProfileRepositoryInterface, UpdateProfileDto, UserProfile};
use crate::infrastructure::database::entities::user_profile;

pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, user_id: &str) -> DomainResult<Option<user_profile::Model>> {
        Ok(user_profile::Entity::find()
            .filter(user_profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl ProfileRepositoryInterface for SeaOrmProfileRepository {
    async fn update_profile(
        &self,
        user_id: &str,
        dto: UpdateProfileDto,
    ) -> DomainResult<Option<UserProfile>> {
        let Some(existing) = self.find_model(user_id).await? else {
            return Ok(None);
        };

        let mut active: user_profile::ActiveModel = existing.into();
        if let Some(phone) = dto.phone {
            active.phone = Set(phone);
        }
        if let Some(birth_date) = dto.birth_date {
            active.birth_date = Set(birth_date);
        }
        if let Some(bio) = dto.bio {
            active.bio = Set(bio);
        }
        if let Some(avatar) = dto.avatar {
            active.avatar = Set(avatar);
        }
        if let Some(is_active) = dto.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;
        Ok(Some(profile_model_to_domain(updated)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{CreateUserDto, UserRepositoryInterface};
    use crate::infrastructure::database::repositories::SeaOrmUserRepository;
    use crate::infrastructure::database::testing::memory_db;

    #[tokio::test]
    async fn partial_update_keeps_untouched_fields() {
        let db = memory_db().await;
        let (account, _) = SeaOrmUserRepository::new(db.clone())
            .create_account(
                CreateUserDto {
                    username: "alice".into(),
                    email: "a@x.com".into(),
                    password_hash: "hash".into(),
                    first_name: String::new(),
                    last_name: String::new(),
                    is_staff: false,
                    is_superuser: false,
                },
                "key".into(),
            )
            .await
            .unwrap();
        let repo = SeaOrmProfileRepository::new(db);
        let user_id = account.user.id.as_str();

        let birth_date = NaiveDate::from_ymd_opt(1990, 5, 17);
        let updated = repo
            .update_profile(
                user_id,
                UpdateProfileDto {
                    phone: Some("+1 555 0100".into()),
                    birth_date: Some(birth_date),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.phone, "+1 555 0100");
        assert_eq!(updated.birth_date, birth_date);
        assert_eq!(updated.bio, "");
        assert!(updated.updated_at >= account.profile.updated_at);
        assert_eq!(updated.created_at, account.profile.created_at);

        let cleared = repo
            .update_profile(
                user_id,
                UpdateProfileDto {
                    birth_date: Some(None),
                    bio: Some("hello".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.birth_date, None);
        assert_eq!(cleared.phone, "+1 555 0100");
        assert_eq!(cleared.bio, "hello");

        assert!(repo
            .update_profile("missing", UpdateProfileDto::default())
            .await
            .unwrap()
            .is_none());
    }
}
