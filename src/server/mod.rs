//! HTTP surface
//!
//! Router, handlers, payload types and the server binding them together.

pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{AppState, HttpServer};
