use std::collections::HashSet;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::guest::is_guest;
use crate::{
    db::{FavoriteStore, InteractionStore},
    error::AppResult,
    models::{Favorite, InteractionKey, NewInteraction},
};

/// Counters for one reconciliation pass
///
/// Every scanned favorite lands in exactly one of `created`, `skipped`
/// or `errors`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
    pub total: usize,
}

impl MigrationReport {
    pub fn is_balanced(&self) -> bool {
        self.created + self.skipped + self.errors == self.total
    }
}

impl Display for MigrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Migration summary:")?;
        writeln!(f, "   Created: {}", self.created)?;
        writeln!(f, "   Skipped: {}", self.skipped)?;
        writeln!(f, "   Errors:  {}", self.errors)?;
        write!(f, "   Total:   {}", self.total)
    }
}

/// Answers whether a `like` interaction already exists for a key
///
/// A lookup may fail for a single key without failing the pass.
pub trait InteractionLookup {
    fn exists(&self, key: &InteractionKey) -> AppResult<bool>;
}

impl InteractionLookup for HashSet<InteractionKey> {
    fn exists(&self, key: &InteractionKey) -> AppResult<bool> {
        Ok(self.contains(key))
    }
}

/// Result of planning a pass without touching any store
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub report: MigrationReport,
    pub to_insert: Vec<NewInteraction>,
}

/// The `like` key a favorite maps to, or `None` for guest favorites
pub fn like_key(favorite: &Favorite) -> Option<InteractionKey> {
    if is_guest(favorite) {
        return None;
    }
    let owner = favorite.owner()?;
    Some(InteractionKey::like(
        owner,
        favorite.item_id.as_str(),
        favorite.item_type,
    ))
}

/// Builds the interaction for a favorite, back-dated to when it was favorited
pub fn new_interaction(favorite: &Favorite, key: InteractionKey, now: DateTime<Utc>) -> NewInteraction {
    NewInteraction {
        key,
        created_at: favorite.created_at.unwrap_or(now),
    }
}

/// Plans which interactions a pass over `favorites` would create.
///
/// Keys planned earlier in the same pass count as existing, so the plan
/// never holds two interactions for one key.
pub fn reconcile<L>(favorites: &[Favorite], lookup: &L, now: DateTime<Utc>) -> Reconciliation
where
    L: InteractionLookup + ?Sized,
{
    let mut report = MigrationReport {
        total: favorites.len(),
        ..Default::default()
    };
    let mut planned: HashSet<InteractionKey> = HashSet::new();
    let mut to_insert = Vec::new();

    for favorite in favorites {
        let Some(key) = like_key(favorite) else {
            report.skipped += 1;
            continue;
        };

        if planned.contains(&key) {
            report.skipped += 1;
            continue;
        }

        match lookup.exists(&key) {
            Ok(true) => report.skipped += 1,
            Ok(false) => {
                planned.insert(key.clone());
                to_insert.push(new_interaction(favorite, key, now));
                report.created += 1;
            }
            Err(e) => {
                tracing::warn!(
                    favorite_id = %favorite.id,
                    item_type = %favorite.item_type,
                    item_id = %favorite.item_id,
                    error = %e,
                    "Interaction lookup failed"
                );
                report.errors += 1;
            }
        }
    }

    Reconciliation { report, to_insert }
}

/// Loads both stores and plans a pass without writing anything
pub async fn plan_migration(
    favorites: &dyn FavoriteStore,
    interactions: &dyn InteractionStore,
    now: DateTime<Utc>,
) -> AppResult<Reconciliation> {
    let all = favorites.list_all().await?;
    tracing::info!(count = all.len(), "Loaded favorites to plan");

    let existing = interactions.like_keys().await?;
    Ok(reconcile(&all, &existing, now))
}

enum Outcome {
    Created,
    Exists,
}

async fn migrate_one(
    interactions: &dyn InteractionStore,
    favorite: &Favorite,
    key: InteractionKey,
    now: DateTime<Utc>,
) -> AppResult<Outcome> {
    if interactions.find_by_key(&key).await?.is_some() {
        return Ok(Outcome::Exists);
    }

    interactions
        .insert(new_interaction(favorite, key, now))
        .await?;
    Ok(Outcome::Created)
}

/// Creates a `like` interaction for every owned favorite that lacks one.
///
/// Favorites are processed one at a time. A failure on one favorite is
/// logged and counted, and the pass moves on; only failing to read the
/// favorites at all is returned as an error. Favorites are never modified.
pub async fn migrate_favorites(
    favorites: &dyn FavoriteStore,
    interactions: &dyn InteractionStore,
    now: DateTime<Utc>,
) -> AppResult<MigrationReport> {
    let all = favorites.list_all().await?;
    tracing::info!(count = all.len(), "Found favorites to migrate");

    let mut report = MigrationReport {
        total: all.len(),
        ..Default::default()
    };

    for favorite in &all {
        let Some(key) = like_key(favorite) else {
            tracing::info!(
                item_type = %favorite.item_type,
                item_id = %favorite.item_id,
                "Skipping guest favorite (no user)"
            );
            report.skipped += 1;
            continue;
        };

        match migrate_one(interactions, favorite, key, now).await {
            Ok(Outcome::Exists) => {
                tracing::info!(
                    item_type = %favorite.item_type,
                    item_id = %favorite.item_id,
                    "Skipping favorite, interaction already exists"
                );
                report.skipped += 1;
            }
            Ok(Outcome::Created) => {
                tracing::info!(
                    item_type = %favorite.item_type,
                    item_id = %favorite.item_id,
                    "Created interaction"
                );
                report.created += 1;
            }
            Err(e) => {
                tracing::error!(
                    favorite_id = %favorite.id,
                    item_type = %favorite.item_type,
                    item_id = %favorite.item_id,
                    error = %e,
                    "Error migrating favorite"
                );
                report.errors += 1;
            }
        }
    }

    Ok(report)
}
