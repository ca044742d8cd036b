//! Database entities module

pub mod auth_token;
pub mod user;
pub mod user_profile;

pub use auth_token::Entity as AuthToken;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
