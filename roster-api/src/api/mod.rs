//! HTTP API handlers for roster-api

pub mod buildinfo;
pub mod health;
pub mod profiles;
pub mod search;
pub mod submit;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use profiles::{get_profile, list_profiles};
pub use search::search_profiles;
pub use submit::submit_profile;
