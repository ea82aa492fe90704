//! Profile submission endpoint

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use roster_common::api::Notice;
use roster_common::draft::{FileAttachment, ProfileDraft};
use roster_common::ProfileRow;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Largest accepted request body (16 MiB)
///
/// Well above the per-image limit so oversized images reach the upload
/// checks and get a proper notice.
pub const MAX_SUBMISSION_BYTES: usize = 16 * 1024 * 1024;

/// Successful submission response
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub notice: Notice,
    pub profile: ProfileRow,
    /// False when the row was stored but the search service did not index it
    pub indexed: bool,
    /// Where to navigate next; absent after a partial success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

/// POST /api/profiles
pub async fn submit_profile(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let draft = read_draft(multipart).await?;
    let outcome = state.submissions.submit(draft).await?;

    let notice = outcome.notice();
    let indexed = outcome.is_indexed();
    let redirect = outcome.redirect();

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            notice,
            profile: outcome.into_profile(),
            indexed,
            redirect,
        }),
    ))
}

/// Collect multipart parts into a draft; unknown parts are ignored
async fn read_draft(mut multipart: Multipart) -> ApiResult<ProfileDraft> {
    let mut draft = ProfileDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" => draft.image = read_file(field).await?,
            "acceptance_email" => draft.acceptance_email = read_file(field).await?,
            "interests" => {
                draft.interests.add(&read_text(field).await?);
            }
            other => {
                let value = read_text(field).await?;
                let slot = match other {
                    "name" => &mut draft.name,
                    "school" => &mut draft.school,
                    "location" => &mut draft.location,
                    "experience" => &mut draft.experience,
                    "looking_for" => &mut draft.looking_for,
                    "email" => &mut draft.email,
                    "support" => &mut draft.support,
                    "linkedin" => &mut draft.linkedin,
                    "portfolio" => &mut draft.portfolio,
                    "instagram" => &mut draft.instagram,
                    "twitter" => &mut draft.twitter,
                    "discord" => &mut draft.discord,
                    _ => {
                        tracing::debug!(field = other, "Ignoring unknown multipart field");
                        continue;
                    }
                };
                *slot = value;
            }
        }
    }

    Ok(draft)
}

async fn read_text(field: Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Unreadable text field: {}", e)))
}

/// An empty file part (no file chosen) counts as absent
async fn read_file(field: Field<'_>) -> ApiResult<Option<FileAttachment>> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Unreadable file field: {}", e)))?;

    if bytes.is_empty() {
        return Ok(None);
    }
    Ok(Some(FileAttachment::new(file_name, content_type, bytes.to_vec())))
}
