use chrono::NaiveDate;

/// Partial identity update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial profile update.
///
/// The nullable columns use `Option<Option<_>>`: outer `None` keeps the
/// stored value, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub phone: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub bio: Option<String>,
    pub avatar: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdateProfileDto {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none()
            && self.birth_date.is_none()
            && self.bio.is_none()
            && self.avatar.is_none()
            && self.is_active.is_none()
    }
}
