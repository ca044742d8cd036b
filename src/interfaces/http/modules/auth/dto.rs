//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::RegisterUserDto;
use crate::interfaces::http::modules::users::{validate_username, UserDto};

/// Registration payload, also accepted by `POST /users`.
///
/// Missing keys deserialize as blank strings so every problem is reported
/// against its own field.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(
        length(min = 8, message = "Ensure this field has at least 8 characters."),
        must_match(other = "password_confirm", message = "Passwords do not match.")
    )]
    pub password: String,
    #[validate(length(min = 8, message = "Ensure this field has at least 8 characters."))]
    pub password_confirm: String,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: String,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: String,
}

impl From<RegisterRequest> for RegisterUserDto {
    fn from(r: RegisterRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            password: r.password,
            first_name: r.first_name,
            last_name: r.last_name,
        }
    }
}

/// Blank credentials are reported once, not per field.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
#[validate(schema(function = "credentials_present"))]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn credentials_present(request: &LoginRequest) -> Result<(), ValidationError> {
    if request.username.is_empty() || request.password.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Username and password are required.".into());
        return Err(err);
    }
    Ok(())
}

/// Returned by register and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    /// Opaque bearer key for the `Authorization` header
    pub token: String,
    pub user: UserDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::{FieldErrors, NON_FIELD_ERRORS};

    fn valid() -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            email: "a@x.com".into(),
            password: "pw123456".into(),
            password_confirm: "pw123456".into(),
            ..Default::default()
        }
    }

    fn errors_of(request: &impl Validate) -> FieldErrors {
        FieldErrors::from(request.validate().unwrap_err())
    }

    #[test]
    fn valid_registration_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn password_mismatch_is_keyed_on_password() {
        let request = RegisterRequest {
            password_confirm: "pw654321".into(),
            ..valid()
        };
        let errors = errors_of(&request);
        assert_eq!(errors.get("password"), Some(&["Passwords do not match.".to_string()][..]));
        assert!(!errors.contains("password_confirm"));
    }

    #[test]
    fn rejects_bad_username_email_and_short_password() {
        let request = RegisterRequest {
            username: "bad name".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            password_confirm: "short".into(),
            first_name: "f".repeat(151),
            ..Default::default()
        };
        let errors = errors_of(&request);
        for field in ["username", "email", "password", "password_confirm", "first_name"] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert!(!errors.contains("last_name"));
    }

    #[test]
    fn blank_username_is_reported_as_blank() {
        let request = RegisterRequest {
            username: String::new(),
            ..valid()
        };
        assert_eq!(
            errors_of(&request).get("username"),
            Some(&["This field may not be blank.".to_string()][..])
        );
    }

    #[test]
    fn blank_login_is_a_non_field_error() {
        let request = LoginRequest {
            username: "alice".into(),
            password: String::new(),
        };
        let errors = errors_of(&request);
        assert_eq!(
            errors.get(NON_FIELD_ERRORS),
            Some(&["Username and password are required.".to_string()][..])
        );
    }
}
