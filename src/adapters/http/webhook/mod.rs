//! Payment webhook HTTP module.

pub mod handlers;
pub mod routes;

pub use handlers::WebhookApiError;
pub use routes::webhook_routes;
