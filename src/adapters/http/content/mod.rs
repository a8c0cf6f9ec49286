//! Content gateway HTTP module.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{BundleFileDto, BundleResponse, ErrorResponse};
pub use handlers::GatewayError;
pub use routes::content_routes;
