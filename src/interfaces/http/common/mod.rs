//! Shared HTTP plumbing: error mapping, validated extraction, response shapes

pub mod api_error;
pub mod responses;
pub mod validated_json;

pub use api_error::ApiError;
pub use responses::{MessageResponse, PaginatedResponse};
pub use validated_json::ValidatedJson;
