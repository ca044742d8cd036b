//! Domain layer: identities, profiles, tokens and access rules

pub mod access;
pub mod repositories;
pub mod token;
pub mod user;

pub use access::{can_access, visibility, Operation, Owned, Visibility};
pub use repositories::{DomainResult, RepositoryProvider};
pub use token::{AuthToken, TokenRepositoryInterface};
pub use user::{
    CreateUserDto, GetUserDto, ProfileRepositoryInterface, RegisterUserDto, UpdateProfileDto,
    UpdateUserDto, User, UserAccount, UserProfile, UserRepositoryInterface, UserSortField,
};

pub use crate::shared::errors::{DomainError, FieldErrors};
