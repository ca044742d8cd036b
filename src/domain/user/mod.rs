//! User aggregate
//!
//! Identity, its one-to-one profile, DTOs and the repository interfaces.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_get;
mod dto_update;

pub use model::{User, UserAccount, UserProfile};

pub use dto_create::{normalize_email, CreateUserDto, RegisterUserDto, EMAIL_TAKEN, USERNAME_TAKEN};
pub use dto_get::{GetUserDto, UserSortField};
pub use dto_update::{UpdateProfileDto, UpdateUserDto};

pub use repository::{ProfileRepositoryInterface, UserRepositoryInterface};
