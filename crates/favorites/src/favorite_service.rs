use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::favorite_store::FavoritesStore;
use crate::favorite_types::*;

/// Service mediating all reads and mutations of per-user favorites lists
#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoritesStore>,
}

impl FavoritesService {
    /// Creates a new instance of `FavoritesService` on top of the provided store
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self { store }
    }

    /// Returns the owner's list with campsite references resolved to full records
    pub async fn get_list(
        &self,
        owner: &Uuid,
    ) -> Result<FavoritesListWithCampsites, FavoritesError> {
        let record = self
            .store
            .find_by_owner(owner)
            .await?
            .ok_or(FavoritesError::ListNotFound)?;

        // Resolve references in stored order. Ids whose campsite has since
        // left the catalog are dropped from the view; the record keeps them.
        let mut loaded: HashMap<Uuid, Campsite> = self
            .store
            .load_campsites(&record.campsites)
            .await?
            .into_iter()
            .map(|campsite| (campsite.id, campsite))
            .collect();
        let campsites = record
            .campsites
            .iter()
            .filter_map(|id| loaded.remove(id))
            .collect();

        Ok(FavoritesListWithCampsites {
            owner: record.owner,
            campsites,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// Unions the given campsite ids into the owner's list, creating it if absent
    pub async fn add_many(
        &self,
        owner: &Uuid,
        raw_ids: &[String],
    ) -> Result<FavoritesList, FavoritesError> {
        let parsed = parse_campsite_ids(raw_ids)?;

        // Collapse duplicates within the payload, keeping first-seen order.
        let mut campsite_ids: Vec<Uuid> = Vec::with_capacity(parsed.len());
        for campsite_id in parsed {
            if !campsite_ids.contains(&campsite_id) {
                campsite_ids.push(campsite_id);
            }
        }

        self.ensure_campsites_exist(&campsite_ids).await?;

        let favorites = self.store.upsert_union(owner, &campsite_ids).await?;
        info!(
            "Added {} campsite(s) to favorites for user {}",
            campsite_ids.len(),
            owner
        );

        Ok(favorites)
    }

    /// Adds a single campsite to the owner's list, creating the list if absent
    pub async fn add_one(
        &self,
        owner: &Uuid,
        raw_id: &str,
    ) -> Result<FavoriteAddition, FavoritesError> {
        let campsite_id = parse_campsite_id(raw_id)?;
        self.ensure_campsites_exist(&[campsite_id]).await?;

        match self.store.append_if_absent(owner, &campsite_id).await? {
            Some(favorites) => {
                info!("Added campsite {} to favorites for user {}", campsite_id, owner);
                Ok(FavoriteAddition {
                    already_present: false,
                    favorites,
                })
            }
            None => {
                // Already in the set: report the unchanged record.
                let favorites = self
                    .store
                    .find_by_owner(owner)
                    .await?
                    .ok_or(FavoritesError::ListNotFound)?;
                Ok(FavoriteAddition {
                    already_present: true,
                    favorites,
                })
            }
        }
    }

    /// Removes a single campsite from the owner's list
    ///
    /// Removing an id that is not in the set is a no-op; the record itself
    /// is never deleted here, so the set may end up empty but present.
    pub async fn remove_one(
        &self,
        owner: &Uuid,
        raw_id: &str,
    ) -> Result<FavoritesList, FavoritesError> {
        let campsite_id = parse_campsite_id(raw_id)?;

        let favorites = self
            .store
            .remove_campsite(owner, &campsite_id)
            .await?
            .ok_or(FavoritesError::ListNotFound)?;
        info!(
            "Removed campsite {} from favorites for user {}",
            campsite_id, owner
        );

        Ok(favorites)
    }

    /// Deletes the owner's entire list record and returns it
    pub async fn clear(&self, owner: &Uuid) -> Result<FavoritesList, FavoritesError> {
        let favorites = self
            .store
            .delete_by_owner(owner)
            .await?
            .ok_or(FavoritesError::ListNotFound)?;
        info!("Cleared favorites for user {}", owner);

        Ok(favorites)
    }

    /// Fails with `CampsiteNotFound` unless every id has a catalog entry
    async fn ensure_campsites_exist(&self, campsite_ids: &[Uuid]) -> Result<(), FavoritesError> {
        if campsite_ids.is_empty() {
            return Ok(());
        }

        let missing = self.store.missing_campsites(campsite_ids).await?;
        if let Some(first) = missing.first() {
            warn!(
                "Rejected favorites mutation for {} unknown campsite(s), first: {}",
                missing.len(),
                first
            );
            return Err(FavoritesError::CampsiteNotFound(*first));
        }

        Ok(())
    }
}
