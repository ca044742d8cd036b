use crate::domain::access::Visibility;
use crate::shared::PageRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSortField {
    /// Newest first.
    #[default]
    DateJoined,
    Username,
    Email,
}

impl UserSortField {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "username" => Self::Username,
            "email" => Self::Email,
            _ => Self::DateJoined,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetUserDto {
    pub visibility: Visibility,
    /// Substring match on username or email.
    pub search: Option<String>,
    pub page: PageRequest,
    pub sort_by: UserSortField,
}
