//! # Roster Common Library
//!
//! Shared code for the attendee roster service:
//! - Profile data shapes (backend row, insert payload, view model)
//! - Typed submission draft and its validation
//! - API notice/error response types
//! - Bootstrap configuration loading

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
pub mod profile;

pub use error::{Error, Result};
pub use profile::{NewProfile, ProfileId, ProfileRow, ProfileView};
