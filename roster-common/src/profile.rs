//! Profile data shapes
//!
//! A profile travels through three shapes:
//! - [`NewProfile`]: the insert payload composed from a validated draft
//! - [`ProfileRow`]: a row as the data backend returns it
//! - [`ProfileView`]: the public view model served to roster readers
//!
//! [`ProfileView::from`] is the only row-to-view mapping; listing and
//! by-ID lookups both go through it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Backend-assigned profile identifier
pub type ProfileId = i64;

/// A persisted attendee row
///
/// Column names follow the backend table. Columns this service does not
/// model are kept in `extra` so the row can be handed to the search
/// indexer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: ProfileId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: String,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub looking_for: String,
    #[serde(default)]
    pub support: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub acceptance_email: Option<String>,
    /// Visibility gate; only approved rows are listed
    #[serde(default, deserialize_with = "null_as_default")]
    pub mukku_approved: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Absent and `null` columns both become the type's default
///
/// Keeps one incomplete row from failing a whole roster fetch.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Insert payload for a new attendee row
///
/// The approval flag is absent: new rows take the backend's
/// column default and stay hidden until approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProfile {
    pub name: String,
    pub school: String,
    pub location: String,
    pub experience: String,
    pub interests: Vec<String>,
    pub looking_for: String,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub support: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub discord: Option<String>,
    pub email: String,
    pub image: String,
    pub acceptance_email: String,
}

/// Public view of a profile
///
/// Private columns (email, acceptance screenshot, approval flag) are not
/// carried over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: ProfileId,
    pub name: String,
    pub school: String,
    pub location: String,
    pub experience: String,
    pub interests: Vec<String>,
    #[serde(rename = "lookingFor")]
    pub looking_for: String,
    pub support: Option<String>,
    pub profile_pic: Option<String>,
    pub linkedin: Option<String>,
    pub portfolio: Option<String>,
    pub instagram: Option<String>,
    pub discord: Option<String>,
    pub twitter: Option<String>,
}

impl From<ProfileRow> for ProfileView {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            school: row.school,
            location: row.location,
            experience: row.experience,
            interests: row.interests.unwrap_or_default(),
            looking_for: row.looking_for,
            support: row.support,
            profile_pic: row.image,
            linkedin: row.linkedin,
            portfolio: row.portfolio,
            instagram: row.instagram,
            discord: row.discord,
            twitter: row.twitter,
        }
    }
}

impl ProfileView {
    /// Return a copy with every link passed through [`ensure_https`]
    pub fn with_normalized_links(mut self) -> Self {
        self.linkedin = ensure_https(self.linkedin.as_deref());
        self.portfolio = ensure_https(self.portfolio.as_deref());
        self.instagram = ensure_https(self.instagram.as_deref());
        self.twitter = ensure_https(self.twitter.as_deref());
        self.discord = ensure_https(self.discord.as_deref());
        self
    }
}

/// Prefix protocol-less links with `https://`
///
/// Empty and absent links both normalize to `None`.
pub fn ensure_https(url: Option<&str>) -> Option<String> {
    let url = url?.trim();
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        Some(format!("https://{}", url))
    }
}
