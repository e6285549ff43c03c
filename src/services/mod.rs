//! Service layer for business logic operations.
//!
//! Services sit between the outer surfaces (HTTP receiver, CLI) and the
//! outbound transport.

pub mod notifications;

pub use notifications::{DispatchReport, Dispatcher};
