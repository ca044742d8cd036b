//! Identity module: accounts & token authentication
//!
//! Contains the `UserService` which orchestrates all account use-cases:
//! registration, login/logout, token resolution, account and profile
//! updates, deactivation and the bootstrap superuser.

pub mod service;

pub use service::{AuthResult, UserService};
