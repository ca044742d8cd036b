//! HTTP REST API interfaces
//!
//! - `middleware`: token authentication middleware
//! - `common`: error mapping, validated JSON, shared response shapes
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc};
