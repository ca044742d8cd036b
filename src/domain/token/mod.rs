//! Bearer token aggregate

pub mod model;
pub mod repository;

pub use model::AuthToken;
pub use repository::TokenRepositoryInterface;
