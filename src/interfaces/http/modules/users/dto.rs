//! User DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::{UpdateProfileDto, UpdateUserDto, UserAccount, UserProfile};

/// Profile API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileDto {
    pub id: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub bio: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileDto {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            phone: p.phone,
            birth_date: p.birth_date,
            bio: p.bio,
            avatar: p.avatar,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// User API representation, profile embedded
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub profile: ProfileDto,
}

impl From<UserAccount> for UserDto {
    fn from(account: UserAccount) -> Self {
        let u = account.user;
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            is_staff: u.is_staff,
            is_superuser: u.is_superuser,
            profile: account.profile.into(),
        }
    }
}

/// Update user request; absent fields are left unchanged.
///
/// `id`, `is_staff` and `is_superuser` are read-only and ignored if sent.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
}

const MAX_USERNAME_LENGTH: usize = 150;

/// Usernames are 1 to 150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let message = if username.is_empty() {
        "This field may not be blank."
    } else if username.chars().count() > MAX_USERNAME_LENGTH {
        "Ensure this field has no more than 150 characters."
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
    } else {
        return Ok(());
    };

    let mut err = ValidationError::new("username");
    err.message = Some(message.into());
    Err(err)
}

impl From<UpdateUserRequest> for UpdateUserDto {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            first_name: r.first_name,
            last_name: r.last_name,
        }
    }
}

/// Partial profile update. `birth_date` and `avatar` accept an explicit
/// `null` to clear the stored value.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>, format = Date)]
    pub birth_date: Option<Option<NaiveDate>>,
    #[validate(length(max = 500, message = "Ensure this field has no more than 500 characters."))]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 100, message = "Ensure this field has no more than 100 characters."))]
    pub avatar: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl From<UpdateProfileRequest> for UpdateProfileDto {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            phone: r.phone,
            birth_date: r.birth_date,
            bio: r.bio,
            avatar: r.avatar,
            is_active: r.is_active,
        }
    }
}

/// Present-but-null becomes `Some(None)`; an absent key stays `None` via
/// `#[serde(default)]`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// List users query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUsersParams {
    /// Search by username or email
    pub search: Option<String>,
    pub page: Option<u32>,
    /// Page size (max 100)
    pub page_size: Option<u32>,
    /// Sort field (date_joined, username, email)
    pub sort_by: Option<String>,
}
