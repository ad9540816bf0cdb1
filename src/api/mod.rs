//! REST access to the school backend.

mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
