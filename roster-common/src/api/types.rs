//! Shared API request/response types
//!
//! Notices are the user-facing outcome of every roster action. A caller
//! renders `title` and `description`; `variant` says whether it is a
//! success message or a failure/warning.

use serde::{Deserialize, Serialize};

// ========================================
// Notice Types
// ========================================

/// Visual weight of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// User-facing notification
///
/// # Examples
///
/// ```
/// use roster_common::api::types::{Notice, NoticeVariant};
///
/// let notice = Notice::destructive("Missing required fields", "Please fill in all required fields.");
/// assert_eq!(notice.variant, NoticeVariant::Destructive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    /// Create a success notice
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    /// Create a failure or warning notice
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }
}

// ========================================
// Error Response Types
// ========================================

/// Machine-readable error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error type identifier (e.g. `NOT_FOUND`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Error response returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    /// Notice to show the user, when the failure has one
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notice: Option<Notice>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            notice: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}

// ========================================
// Tests
// ========================================
