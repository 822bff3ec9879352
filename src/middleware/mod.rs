// ABOUTME: HTTP middleware for request correlation, CORS, and bearer authentication
// ABOUTME: Request IDs are attached to every request and echoed on every response

/// Bearer token authentication
pub mod auth;
/// CORS layer from configuration
pub mod cors;
/// Request id propagation
pub mod request_id;

pub use auth::{authenticate, bearer_token, AuthenticatedUser};
pub use cors::setup_cors;
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
