use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::favorite_types::{Campsite, FavoritesError, FavoritesList};

/// Persistence contract the favorites service relies on.
///
/// Every mutation method maps to a single atomic store call: the store
/// never does a separate read-modify-write cycle, so concurrent mutations
/// for the same owner converge without application-level locking.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Reads the owner's raw record, if any. No side effects.
    async fn find_by_owner(&self, owner: &Uuid) -> Result<Option<FavoritesList>, FavoritesError>;

    /// Creates the owner's record holding `campsite_ids`, or unions the ids
    /// into the existing record. `campsite_ids` must be duplicate-free.
    async fn upsert_union(
        &self,
        owner: &Uuid,
        campsite_ids: &[Uuid],
    ) -> Result<FavoritesList, FavoritesError>;

    /// Creates the owner's record holding the single id, or appends the id
    /// when it is not yet present. Returns `None` when the id was already
    /// in the record, which is then left untouched.
    async fn append_if_absent(
        &self,
        owner: &Uuid,
        campsite_id: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError>;

    /// Removes the id from the owner's record. Returns `None` when the
    /// owner has no record at all; removing an id that is not in the
    /// record returns the record unchanged.
    async fn remove_campsite(
        &self,
        owner: &Uuid,
        campsite_id: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError>;

    /// Deletes the owner's record and returns it. `None` when there was
    /// nothing to delete.
    async fn delete_by_owner(&self, owner: &Uuid)
    -> Result<Option<FavoritesList>, FavoritesError>;

    /// Returns the subset of `campsite_ids` that have no catalog entry.
    async fn missing_campsites(&self, campsite_ids: &[Uuid])
    -> Result<Vec<Uuid>, FavoritesError>;

    /// Loads catalog entries for the given ids. Ids without a catalog
    /// entry are skipped; order is unspecified.
    async fn load_campsites(&self, campsite_ids: &[Uuid])
    -> Result<Vec<Campsite>, FavoritesError>;
}

/// Postgres-backed favorites store.
///
/// One row per owner in the `favorites` table; campsite references live in
/// a `UUID[]` column that is only ever mutated through single-statement
/// updates, so Postgres row locking keeps concurrent mutations convergent.
pub struct PgFavoritesStore {
    pool: PgPool,
}

impl PgFavoritesStore {
    /// Creates a new store on top of the provided connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the idempotent query that creates the tables this store
    /// relies on. Suitable for inclusion in migration scripts.
    pub fn migration_query() -> &'static str {
        r#"
-- Campsite catalog. Canonically owned by the catalog subsystem; created
-- here so standalone deployments can resolve references.
CREATE TABLE IF NOT EXISTS campsites (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    elevation INT NOT NULL DEFAULT 0,
    cost_per_night DOUBLE PRECISION NOT NULL DEFAULT 0,
    featured BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Favorites records: at most one row per user.
CREATE TABLE IF NOT EXISTS favorites (
    user_id UUID PRIMARY KEY,
    campsite_ids UUID[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#
    }

    /// Creates the tables this store relies on, if they are missing.
    /// Idempotent, so it can run on every startup.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        use sqlx::Executor as _;

        self.pool.execute(Self::migration_query()).await?;
        Ok(())
    }

    fn record_from_row(row: &PgRow) -> FavoritesList {
        FavoritesList {
            owner: row.get("user_id"),
            campsites: row.get("campsite_ids"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn campsite_from_row(row: &PgRow) -> Campsite {
        Campsite {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            elevation: row.get("elevation"),
            cost_per_night: row.get("cost_per_night"),
            featured: row.get("featured"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl FavoritesStore for PgFavoritesStore {
    async fn find_by_owner(&self, owner: &Uuid) -> Result<Option<FavoritesList>, FavoritesError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, campsite_ids, created_at, updated_at
            FROM favorites
            WHERE user_id = $1
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::record_from_row))
    }

    async fn upsert_union(
        &self,
        owner: &Uuid,
        campsite_ids: &[Uuid],
    ) -> Result<FavoritesList, FavoritesError> {
        // Single-statement create-or-union: the DO UPDATE arm appends only
        // the ids the stored array does not already contain.
        let row = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, campsite_ids)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET campsite_ids = favorites.campsite_ids || (
                    SELECT COALESCE(array_agg(new_id), ARRAY[]::uuid[])
                    FROM unnest(EXCLUDED.campsite_ids) AS new_id
                    WHERE new_id <> ALL (favorites.campsite_ids)
                ),
                updated_at = NOW()
            RETURNING user_id, campsite_ids, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(campsite_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(Self::record_from_row(&row))
    }

    async fn append_if_absent(
        &self,
        owner: &Uuid,
        campsite_id: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError> {
        // The DO UPDATE arm is guarded by a containment check, so an
        // already-present id yields no row instead of a duplicate entry.
        let row = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, campsite_ids)
            VALUES ($1, ARRAY[$2]::uuid[])
            ON CONFLICT (user_id) DO UPDATE
            SET campsite_ids = array_append(favorites.campsite_ids, $2),
                updated_at = NOW()
            WHERE NOT (favorites.campsite_ids @> ARRAY[$2]::uuid[])
            RETURNING user_id, campsite_ids, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(campsite_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::record_from_row))
    }

    async fn remove_campsite(
        &self,
        owner: &Uuid,
        campsite_id: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError> {
        let row = sqlx::query(
            r#"
            UPDATE favorites
            SET campsite_ids = array_remove(campsite_ids, $2),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING user_id, campsite_ids, created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(campsite_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::record_from_row))
    }

    async fn delete_by_owner(
        &self,
        owner: &Uuid,
    ) -> Result<Option<FavoritesList>, FavoritesError> {
        let row = sqlx::query(
            r#"
            DELETE FROM favorites
            WHERE user_id = $1
            RETURNING user_id, campsite_ids, created_at, updated_at
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(Self::record_from_row))
    }

    async fn missing_campsites(
        &self,
        campsite_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, FavoritesError> {
        let rows = sqlx::query(
            r#"
            SELECT candidate_id
            FROM unnest($1::uuid[]) AS candidate(candidate_id)
            WHERE NOT EXISTS (
                SELECT 1 FROM campsites WHERE campsites.id = candidate.candidate_id
            )
            "#,
        )
        .bind(campsite_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("candidate_id")).collect())
    }

    async fn load_campsites(
        &self,
        campsite_ids: &[Uuid],
    ) -> Result<Vec<Campsite>, FavoritesError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, elevation, cost_per_night, featured,
                   created_at, updated_at
            FROM campsites
            WHERE id = ANY($1)
            "#,
        )
        .bind(campsite_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::campsite_from_row).collect())
    }
}
