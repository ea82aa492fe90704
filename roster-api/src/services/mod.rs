//! Roster services
//!
//! Clients for the two external collaborators (data backend, search
//! service) and the orchestration built on top of them.

pub mod backend_client;
pub mod hybrid_search;
pub mod roster;
pub mod search_client;
pub mod submission;
pub mod upload;

pub use backend_client::{BackendError, DataBackend, SupabaseClient};
pub use hybrid_search::{hybrid_search, SearchOutcome};
pub use roster::RosterCache;
pub use search_client::{HttpSearchClient, SearchError, SearchIndex};
pub use submission::{SubmissionError, SubmissionOutcome, SubmissionService};
pub use upload::{UploadError, UploadedFile};
