//! Outbound HTTP: the transport abstraction and its reqwest implementation.

pub mod client;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ReqwestTransport;
pub use transport::{HttpTransport, OutboundRequest, TransportResponse};
