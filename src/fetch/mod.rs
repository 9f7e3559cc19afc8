//! HTTP transport seam.
//!
//! [`HttpClient`] abstracts request execution so the backend client can be
//! exercised against a stub in tests, and so deployments that front the
//! backend with a token check can wrap the transport in
//! [`auth::BearerToken`] without the caller changing.

pub mod auth;
mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;
