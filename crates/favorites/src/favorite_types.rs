use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user's favorites record as persisted by the store.
///
/// `campsites` has set semantics: entries are unique, and their order only
/// reflects insertion history. Mutation handlers return this raw shape;
/// reads resolve it into [`FavoritesListWithCampsites`].
#[derive(Debug, Clone, Serialize)]
pub struct FavoritesList {
    /// User the list belongs to
    pub owner: Uuid,
    /// Campsite references held by the list
    pub campsites: Vec<Uuid>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated
    pub updated_at: DateTime<Utc>,
}

/// A favorites record with campsite references resolved to catalog entries
#[derive(Debug, Serialize)]
pub struct FavoritesListWithCampsites {
    /// User the list belongs to
    pub owner: Uuid,
    /// Resolved campsite records, in stored reference order
    pub campsites: Vec<Campsite>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Catalog entry for a campsite, as resolved on reads.
///
/// The catalog itself is owned by a separate subsystem; this crate only
/// reads it to check existence and to resolve references.
#[derive(Debug, Clone, Serialize)]
pub struct Campsite {
    /// Unique identifier for the campsite
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Elevation in feet
    pub elevation: i32,
    /// Nightly rate in dollars
    pub cost_per_night: f64,
    /// Whether the campsite is featured on the landing page
    pub featured: bool,
    /// When the catalog entry was created
    pub created_at: DateTime<Utc>,
    /// When the catalog entry was last updated
    pub updated_at: DateTime<Utc>,
}

/// Outcome of adding a single campsite to a favorites list
#[derive(Debug, Serialize)]
pub struct FavoriteAddition {
    /// True when the campsite was already favorited and nothing changed
    pub already_present: bool,
    /// The list after the operation
    pub favorites: FavoritesList,
}

/// Custom error type for favorites operations
#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// The campsite identifier in the request is not a valid id
    #[error("Invalid campsite id: {0}")]
    InvalidCampsiteId(String),

    /// The referenced campsite does not exist in the catalog
    #[error("Campsite {0} not found")]
    CampsiteNotFound(Uuid),

    /// The user has no favorites list
    #[error("Favorites list not found")]
    ListNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl actix_web::ResponseError for FavoritesError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            FavoritesError::InvalidCampsiteId(id) => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "invalid_campsite_id",
                    "message": format!("{} is not a valid campsite id", id)
                }))
            }
            FavoritesError::CampsiteNotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "campsite_not_found",
                    "message": "Campsite not found"
                }))
            }
            FavoritesError::ListNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "favorites_not_found",
                "message": "You have no favorites yet"
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}

/// Parses a campsite id from its request form.
pub fn parse_campsite_id(raw: &str) -> Result<Uuid, FavoritesError> {
    Uuid::parse_str(raw.trim()).map_err(|_| FavoritesError::InvalidCampsiteId(raw.to_string()))
}

/// Parses a request body of campsite ids. Any malformed entry rejects the
/// whole batch; duplicates are passed through for the service to collapse.
pub fn parse_campsite_ids(raw: &[String]) -> Result<Vec<Uuid>, FavoritesError> {
    raw.iter().map(|value| parse_campsite_id(value)).collect()
}
