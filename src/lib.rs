//! Protein feature aggregation service library.

pub mod annotation;
pub mod cache;
pub mod config;
pub mod feature;
pub mod frequency;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::schema::ServiceConfig;
pub use feature::{FeatureDocument, FeatureError, FeatureService};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
