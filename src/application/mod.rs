//! Application layer - use-case orchestration over the domain

pub mod identity;

pub use identity::{AuthResult, UserService};
