//! API module for shared HTTP API types
//!
//! # Design Principle
//!
//! This module contains ONLY plain serializable types. No HTTP framework
//! dependencies; the service crate wraps these in axum responses.

pub mod types;

pub use types::{ErrorBody, ErrorResponse, Notice, NoticeVariant};
