//! Profile submission pipeline
//!
//! Phases run strictly in order, one network call at a time:
//! 1. validate the draft and pre-check attachments (no I/O)
//! 2. upload the profile image, then the acceptance screenshot
//! 3. compose the insert payload
//! 4. insert exactly one row
//! 5. hand the inserted row to the search indexer (best-effort)
//!
//! Persistence and indexing are not transactional. An indexing failure
//! leaves the row in place and is reported as a degraded success.

use std::sync::Arc;

use roster_common::api::Notice;
use roster_common::draft::{DraftError, ProfileDraft, ValidatedDraft};
use roster_common::{NewProfile, ProfileRow};
use thiserror::Error;
use tracing::{error, info, warn};

use super::backend_client::{BackendError, DataBackend};
use super::search_client::SearchIndex;
use super::upload::{check_image, upload_image, UploadError};

/// Where the caller should navigate after a completed submission
pub const SUCCESS_REDIRECT: &str = "/";

/// Submission failures; nothing was persisted when one of these is returned
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Validation(#[from] DraftError),

    #[error("Attachment rejected: {0}")]
    FileRejected(UploadError),

    #[error("Upload failed: {0}")]
    Upload(UploadError),

    #[error("Insert failed: {0}")]
    Persist(BackendError),
}

impl SubmissionError {
    /// User-facing notice for this failure
    pub fn notice(&self) -> Notice {
        match self {
            SubmissionError::Validation(_) => Notice::destructive(
                "Missing required fields",
                "Please fill in all required fields to submit your profile.",
            ),
            SubmissionError::FileRejected(UploadError::FileTooLarge { .. }) => {
                Notice::destructive("File too large", "File size must be less than 5MB.")
            }
            SubmissionError::FileRejected(_) => {
                Notice::destructive("Invalid file type", "Please select an image file.")
            }
            SubmissionError::Upload(_) | SubmissionError::Persist(_) => Notice::destructive(
                "Error submitting profile",
                "There was an error submitting your profile. Please try again.",
            ),
        }
    }
}

/// Result of a submission that reached the backend
#[derive(Debug, Clone)]
pub enum SubmissionOutcome {
    /// Row inserted and registered for semantic search
    Indexed(ProfileRow),
    /// Row inserted, but the indexer did not accept it
    IndexingFailed { profile: ProfileRow, reason: String },
}

impl SubmissionOutcome {
    pub fn into_profile(self) -> ProfileRow {
        match self {
            SubmissionOutcome::Indexed(profile) => profile,
            SubmissionOutcome::IndexingFailed { profile, .. } => profile,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self, SubmissionOutcome::Indexed(_))
    }

    /// Redirect target; only a fully successful submission navigates away
    pub fn redirect(&self) -> Option<&'static str> {
        self.is_indexed().then_some(SUCCESS_REDIRECT)
    }

    pub fn notice(&self) -> Notice {
        match self {
            SubmissionOutcome::Indexed(_) => Notice::success(
                "Profile submitted successfully!",
                "Your profile has been added to the roster. You'll be notified when it goes live.",
            ),
            SubmissionOutcome::IndexingFailed { .. } => Notice::destructive(
                "Profile submitted but indexing failed",
                "Your profile was submitted but there was an error indexing it. Please contact support.",
            ),
        }
    }
}

/// Runs the submission pipeline against injected collaborators
pub struct SubmissionService {
    backend: Arc<dyn DataBackend>,
    search: Arc<dyn SearchIndex>,
    placeholder_image_url: String,
}

impl SubmissionService {
    pub fn new(
        backend: Arc<dyn DataBackend>,
        search: Arc<dyn SearchIndex>,
        placeholder_image_url: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            search,
            placeholder_image_url: placeholder_image_url.into(),
        }
    }

    /// Submit a draft
    ///
    /// Every call that passes validation inserts a new row; identical drafts
    /// are not de-duplicated.
    pub async fn submit(&self, draft: ProfileDraft) -> Result<SubmissionOutcome, SubmissionError> {
        let validated = validate(draft)?;

        let image_url = match &validated.image {
            Some(file) => Some(
                upload_image(self.backend.as_ref(), file)
                    .await
                    .map_err(SubmissionError::Upload)?
                    .public_url,
            ),
            None => None,
        };
        let acceptance_url = upload_image(self.backend.as_ref(), &validated.acceptance_email)
            .await
            .map_err(SubmissionError::Upload)?
            .public_url;

        let record = compose(
            validated,
            image_url,
            acceptance_url,
            &self.placeholder_image_url,
        );

        let row = self.backend.insert_profile(&record).await.map_err(|e| {
            error!(error = %e, "Error submitting profile to data backend");
            SubmissionError::Persist(e)
        })?;
        info!(profile_id = row.id, "Profile persisted");

        match self.search.index_profile(&row).await {
            Ok(_) => Ok(SubmissionOutcome::Indexed(row)),
            Err(e) => {
                warn!(profile_id = row.id, error = %e, "Profile persisted but indexing failed");
                Ok(SubmissionOutcome::IndexingFailed {
                    profile: row,
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Required fields first, then attachment pre-checks
pub fn validate(draft: ProfileDraft) -> Result<ValidatedDraft, SubmissionError> {
    let validated = draft.validate()?;

    if let Some(image) = &validated.image {
        check_image(image).map_err(SubmissionError::FileRejected)?;
    }
    check_image(&validated.acceptance_email).map_err(SubmissionError::FileRejected)?;

    Ok(validated)
}

/// Build the insert payload, substituting the placeholder for a missing image
pub fn compose(
    draft: ValidatedDraft,
    image_url: Option<String>,
    acceptance_url: String,
    placeholder_image_url: &str,
) -> NewProfile {
    NewProfile {
        name: draft.name,
        school: draft.school,
        location: draft.location,
        experience: draft.experience,
        interests: draft.interests.into(),
        looking_for: draft.looking_for,
        linkedin: draft.linkedin,
        portfolio: draft.portfolio,
        support: draft.support,
        instagram: draft.instagram,
        twitter: draft.twitter,
        discord: draft.discord,
        email: draft.email,
        image: image_url.unwrap_or_else(|| placeholder_image_url.to_string()),
        acceptance_email: acceptance_url,
    }
}
