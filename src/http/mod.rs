//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, query extraction)
//!     → handlers.rs (cache lookup, feature service)
//!     → response.rs (document JSON, or error status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use handlers::HealthResponse;
pub use request::{FeatureQuery, RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use response::ErrorResponse;
pub use server::{AppState, HttpServer};
