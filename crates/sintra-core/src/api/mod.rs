//! Backend REST API boundary.
//!
//! All resources are read with plain GETs; creating and deleting tasks are
//! the only mutations. Every failure is normalized into [`ApiError`].

pub mod client;
pub mod endpoint;
pub mod errors;

pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use errors::{ApiError, extract_detail};
