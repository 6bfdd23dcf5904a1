use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::favorite_store::FavoritesStore;
use crate::favorite_types::{Campsite, FavoritesError, FavoritesList};

#[derive(Default)]
struct State {
    records: HashMap<Uuid, FavoritesList>,
    catalog: HashMap<Uuid, Campsite>,
}

/// An in-memory favorites store.
///
/// # Limitations
///
/// This store won't persist data between server restarts and won't
/// synchronize data between multiple server instances. It is primarily
/// intended for testing and local development.
#[derive(Clone)]
pub struct InMemoryFavoritesStore {
    state: Arc<Mutex<State>>,
}

impl std::fmt::Debug for InMemoryFavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFavoritesStore")
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryFavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFavoritesStore {
    /// Creates a new (empty) in-memory favorites store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Adds a campsite to the catalog so existence checks and reference
    /// resolution can find it.
    pub async fn put_campsite(&self, campsite: Campsite) {
        let mut state = self.state.lock().await;
        state.catalog.insert(campsite.id, campsite);
    }

    /// Drops a campsite from the catalog. Favorites records keep any
    /// reference to it, which then dangles.
    pub async fn remove_from_catalog(&self, campsite_id: &Uuid) {
        let mut state = self.state.lock().await;
        state.catalog.remove(campsite_id);
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn find_by_owner(&self, owner: &Uuid) -> Result<Option<FavoritesList>, FavoritesError> {
        let state = self.state.lock().await;
        Ok(state.records.get(owner).cloned())
    }

    async fn upsert_union(
        &self,
        owner: &Uuid,
        campsite_ids: &[Uuid],
    ) -> Result<FavoritesList, FavoritesError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let record = state.records.entry(*owner).or_insert_with(|| FavoritesList {
            owner: *owner,
            campsites: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        for campsite_id in campsite_ids {
            if !record.campsites.contains(campsite_id) {
                record.campsites.push(*campsite_id);
            }
        }
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn append_if_absent(
        &self,
        owner: &Uuid,
        campsite_id: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let record = state.records.entry(*owner).or_insert_with(|| FavoritesList {
            owner: *owner,
            campsites: Vec::new(),
            created_at: now,
            updated_at: now,
        });
        if record.campsites.contains(campsite_id) {
            return Ok(None);
        }
        record.campsites.push(*campsite_id);
        record.updated_at = now;
        Ok(Some(record.clone()))
    }

    async fn remove_campsite(
        &self,
        owner: &Uuid,
        campsite_id: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError> {
        let mut state = self.state.lock().await;
        let Some(record) = state.records.get_mut(owner) else {
            return Ok(None);
        };
        record.campsites.retain(|id| id != campsite_id);
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete_by_owner(
        &self,
        owner: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError> {
        let mut state = self.state.lock().await;
        Ok(state.records.remove(owner))
    }

    async fn missing_campsites(
        &self,
        campsite_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, FavoritesError> {
        let state = self.state.lock().await;
        Ok(campsite_ids
            .iter()
            .filter(|id| !state.catalog.contains_key(id))
            .copied()
            .collect())
    }

    async fn load_campsites(
        &self,
        campsite_ids: &[Uuid],
    ) -> Result<Vec<Campsite>, FavoritesError> {
        let state = self.state.lock().await;
        Ok(campsite_ids
            .iter()
            .filter_map(|id| state.catalog.get(id).cloned())
            .collect())
    }
}
