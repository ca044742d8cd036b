use chrono::{DateTime, Utc};

/// Opaque bearer credential. At most one exists per identity and it stays
/// valid until deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub key: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
