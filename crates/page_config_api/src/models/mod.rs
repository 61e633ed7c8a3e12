//! HTTP request and response models
//!
//! This module contains all HTTP-specific types for requests and responses.
//! These types are distinct from domain types and exist only in the HTTP layer.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::UpdateFieldRequest;
pub use response::{ConfigResponse, PageResponse, SectionResponse};
