//! Typed profile submission draft
//!
//! A [`ProfileDraft`] is the in-memory form state. It can hold anything a
//! caller typed, including blanks. [`ProfileDraft::validate`] is the only
//! way to obtain a [`ValidatedDraft`], whose required fields are known to be
//! present and whose acceptance screenshot is non-optional.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Draft validation failure
///
/// Reported once for the whole draft; the missing fields are not listed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please fill in all required fields to submit your profile.")]
    MissingRequiredFields,
}

/// A binary file attached to a draft
#[derive(Clone, PartialEq, Eq)]
pub struct FileAttachment {
    /// Original file name as supplied by the caller
    pub file_name: String,
    /// Declared MIME type (e.g. `image/png`)
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Keep file contents out of logs
impl std::fmt::Debug for FileAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Ordered set of interest tags
///
/// Tags are trimmed on entry. Blank tags and exact duplicates are ignored,
/// insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct InterestTags(Vec<String>);

impl InterestTags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag, returning `true` if it was not already present
    pub fn add(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.0.iter().any(|t| t == tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for InterestTags {
    fn from(tags: Vec<String>) -> Self {
        let mut set = Self::new();
        for tag in &tags {
            set.add(tag);
        }
        set
    }
}

impl From<InterestTags> for Vec<String> {
    fn from(tags: InterestTags) -> Self {
        tags.0
    }
}

/// Form state for a profile submission
#[derive(Debug, Clone, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub school: String,
    pub location: String,
    pub experience: String,
    pub interests: InterestTags,
    pub looking_for: String,
    pub linkedin: String,
    pub portfolio: String,
    pub support: String,
    pub instagram: String,
    pub twitter: String,
    pub discord: String,
    pub email: String,
    pub image: Option<FileAttachment>,
    pub acceptance_email: Option<FileAttachment>,
}

/// A draft that passed required-field validation
#[derive(Debug, Clone)]
pub struct ValidatedDraft {
    pub name: String,
    pub school: String,
    pub location: String,
    pub experience: String,
    pub interests: InterestTags,
    pub looking_for: String,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub support: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub email: String,
    pub image: Option<FileAttachment>,
    pub acceptance_email: FileAttachment,
}

impl ProfileDraft {
    /// Check required fields without touching the network
    pub fn validate(self) -> Result<ValidatedDraft, DraftError> {
        let required = [
            &self.name,
            &self.school,
            &self.location,
            &self.experience,
            &self.looking_for,
            &self.email,
        ];
        if required.iter().any(|value| value.trim().is_empty()) {
            return Err(DraftError::MissingRequiredFields);
        }
        let acceptance_email = self
            .acceptance_email
            .ok_or(DraftError::MissingRequiredFields)?;

        Ok(ValidatedDraft {
            name: self.name.trim().to_string(),
            school: self.school.trim().to_string(),
            location: self.location.trim().to_string(),
            experience: self.experience.trim().to_string(),
            interests: self.interests,
            looking_for: self.looking_for.trim().to_string(),
            linkedin: optional_text(self.linkedin),
            portfolio: optional_text(self.portfolio),
            support: optional_text(self.support),
            instagram: optional_text(self.instagram),
            twitter: optional_text(self.twitter),
            discord: optional_text(self.discord),
            email: self.email.trim().to_string(),
            image: self.image,
            acceptance_email,
        })
    }
}

fn optional_text(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
