//! Hybrid roster search
//!
//! Blends the semantic ranking of the external search service with a local
//! case-insensitive keyword filter over the cached roster. Semantic hits
//! come first, in service order; keyword hits follow; a profile present in
//! both keeps its semantic position.

use std::collections::HashSet;

use roster_common::{ProfileId, ProfileView};
use serde::Serialize;

use super::search_client::SearchIndex;

/// Displayed result set
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub profiles: Vec<ProfileView>,
    /// Semantic search was unavailable; results are keyword-only
    pub degraded: bool,
}

impl SearchOutcome {
    pub fn count(&self) -> usize {
        self.profiles.len()
    }
}

/// Whether `profile` matches an already lowercased query
fn matches_keyword(profile: &ProfileView, needle: &str) -> bool {
    let fields = [
        &profile.name,
        &profile.location,
        &profile.experience,
        &profile.school,
        &profile.looking_for,
    ];
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
        || profile
            .interests
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Profiles whose text fields or tags contain `query`, case-insensitively
pub fn keyword_matches<'a>(query: &str, profiles: &'a [ProfileView]) -> Vec<&'a ProfileView> {
    let needle = query.to_lowercase();
    profiles
        .iter()
        .filter(|profile| matches_keyword(profile, &needle))
        .collect()
}

/// Semantic hits first, then keyword hits, de-duplicated by ID
///
/// Semantic IDs that are not in `profiles` (e.g. unapproved rows the
/// indexer knows about) are skipped.
pub fn merge_results(
    semantic_ids: &[ProfileId],
    keyword_hits: &[&ProfileView],
    profiles: &[ProfileView],
) -> Vec<ProfileView> {
    let semantic_hits = semantic_ids
        .iter()
        .filter_map(|id| profiles.iter().find(|p| p.id == *id));

    let mut seen = HashSet::new();
    semantic_hits
        .chain(keyword_hits.iter().copied())
        .filter(|profile| seen.insert(profile.id))
        .cloned()
        .collect()
}

/// Run a hybrid search over an in-memory roster
///
/// A blank query returns the roster unchanged without contacting the
/// search service. A failing search service degrades to keyword-only
/// results.
pub async fn hybrid_search(
    search: &dyn SearchIndex,
    query: &str,
    profiles: &[ProfileView],
) -> SearchOutcome {
    if query.trim().is_empty() {
        return SearchOutcome {
            profiles: profiles.to_vec(),
            degraded: false,
        };
    }

    let (semantic_ids, degraded) = match search.top_k(query).await {
        Ok(ids) => (ids, false),
        Err(e) => {
            tracing::warn!(error = %e, "Semantic search failed, using keyword results only");
            (Vec::new(), true)
        }
    };

    let keyword_hits = keyword_matches(query, profiles);
    let merged = merge_results(&semantic_ids, &keyword_hits, profiles);

    tracing::debug!(
        semantic = semantic_ids.len(),
        keyword = keyword_hits.len(),
        results = merged.len(),
        degraded,
        "Hybrid search complete"
    );

    SearchOutcome {
        profiles: merged,
        degraded,
    }
}
