//! Users module: current user, identity collection, profile updates

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
