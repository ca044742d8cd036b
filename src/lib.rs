//! # Account Service
//!
//! User-account backend: registration, token login/logout, profiles and
//! per-user access checks over a REST API.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: entities, DTOs, repository traits, permission evaluator
//! - **application**: account use cases (`UserService`)
//! - **infrastructure**: crypto primitives, SeaORM entities, migrations, repositories
//! - **interfaces**: REST API with token middleware and Swagger documentation
//! - **shared**: error types, pagination, shutdown coordination
//! - **config** / **server**: TOML configuration and server lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
