//! DSP proxy
//!
//! Request types and the gateway that relays authenticated queries upstream.

pub mod gateway;
pub mod types;

pub use gateway::ProxyGateway;
pub use types::QueryRequest;
