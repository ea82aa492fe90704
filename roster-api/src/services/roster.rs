//! Roster reads and the cached roster snapshot
//!
//! Every read goes through [`ProfileView::from`], so the listing and the
//! by-ID lookup share one transform.

use std::sync::Arc;

use roster_common::{ProfileId, ProfileView};
use tokio::sync::RwLock;

use super::backend_client::{BackendError, DataBackend};

/// Fetch the approved roster
///
/// Rows without the approval flag are dropped even if the backend returns
/// them.
pub async fn list_approved(backend: &dyn DataBackend) -> Result<Vec<ProfileView>, BackendError> {
    let rows = backend.fetch_approved().await?;
    Ok(rows
        .into_iter()
        .filter(|row| row.mukku_approved)
        .map(ProfileView::from)
        .collect())
}

/// Fetch one profile, `Ok(None)` when the ID does not exist
pub async fn find_profile(
    backend: &dyn DataBackend,
    id: ProfileId,
) -> Result<Option<ProfileView>, BackendError> {
    Ok(backend.fetch_by_id(id).await?.map(ProfileView::from))
}

/// Last fetched approved roster
///
/// Replaced by every listing; search reads it. Nothing else invalidates it.
#[derive(Debug, Default)]
pub struct RosterCache {
    snapshot: RwLock<Option<Arc<Vec<ProfileView>>>>,
}

impl RosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<Vec<ProfileView>>> {
        self.snapshot.read().await.clone()
    }

    pub async fn replace(&self, profiles: Vec<ProfileView>) -> Arc<Vec<ProfileView>> {
        let profiles = Arc::new(profiles);
        *self.snapshot.write().await = Some(profiles.clone());
        profiles
    }

    /// Fetch and store the roster from `backend`
    pub async fn refresh(
        &self,
        backend: &dyn DataBackend,
    ) -> Result<Arc<Vec<ProfileView>>, BackendError> {
        let profiles = list_approved(backend).await?;
        tracing::debug!(count = profiles.len(), "Roster snapshot refreshed");
        Ok(self.replace(profiles).await)
    }

    /// Cached roster, loading it on first use
    pub async fn get_or_load(
        &self,
        backend: &dyn DataBackend,
    ) -> Result<Arc<Vec<ProfileView>>, BackendError> {
        if let Some(profiles) = self.get().await {
            return Ok(profiles);
        }
        self.refresh(backend).await
    }
}
