use chrono::{DateTime, NaiveDate, Utc};

/// Account identity. `password_hash` is a bcrypt hash, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Optional attributes attached 1:1 to a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub bio: String,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Blank profile created alongside a new identity.
    pub fn blank(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            phone: String::new(),
            birth_date: None,
            bio: String::new(),
            avatar: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity together with its profile, the shape handed to the API layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub user: User,
    pub profile: UserProfile,
}
