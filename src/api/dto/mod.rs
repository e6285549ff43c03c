//! Data Transfer Objects for API requests and responses.
//!
//! - `dispatch` - hook receiver response
//! - `error` - common error response
//! - `health` - health check response

mod dispatch;
mod error;
mod health;

pub use dispatch::DispatchResponse;
pub use error::ErrorResponse;
pub use health::{AdapterCounts, HealthResponse, HealthStatus};
