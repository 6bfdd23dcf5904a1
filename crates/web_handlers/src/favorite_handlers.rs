use actix_web::{HttpResponse, Result, web};

use auth_services::middleware::Owner;
use favorites::{FavoritesError, FavoritesService};

/// Returns the authenticated user's favorites with campsites populated
pub async fn get_favorites(
    service: web::Data<FavoritesService>,
    owner: Owner,
) -> Result<HttpResponse, FavoritesError> {
    let list = service.get_list(&owner.0).await?;

    Ok(HttpResponse::Ok().json(list))
}

/// Adds a batch of campsites to the authenticated user's favorites
pub async fn add_favorites(
    service: web::Data<FavoritesService>,
    owner: Owner,
    request: web::Json<Vec<String>>,
) -> Result<HttpResponse, FavoritesError> {
    let campsite_ids = request.into_inner();
    let favorites = service.add_many(&owner.0, &campsite_ids).await?;

    Ok(HttpResponse::Ok().json(favorites))
}

/// Adds a single campsite to the authenticated user's favorites
pub async fn add_favorite(
    service: web::Data<FavoritesService>,
    owner: Owner,
    path: web::Path<String>,
) -> Result<HttpResponse, FavoritesError> {
    let campsite_id = path.into_inner();
    let addition = service.add_one(&owner.0, &campsite_id).await?;

    Ok(HttpResponse::Ok().json(addition))
}

/// Removes a single campsite from the authenticated user's favorites
pub async fn remove_favorite(
    service: web::Data<FavoritesService>,
    owner: Owner,
    path: web::Path<String>,
) -> Result<HttpResponse, FavoritesError> {
    let campsite_id = path.into_inner();
    let favorites = service.remove_one(&owner.0, &campsite_id).await?;

    Ok(HttpResponse::Ok().json(favorites))
}

/// Deletes the authenticated user's favorites record entirely
pub async fn clear_favorites(
    service: web::Data<FavoritesService>,
    owner: Owner,
) -> Result<HttpResponse, FavoritesError> {
    let deleted = service.clear(&owner.0).await?;

    Ok(HttpResponse::Ok().json(deleted))
}

/// Rejects PUT on the favorites collection
pub async fn put_favorites_unsupported() -> HttpResponse {
    operation_not_supported("PUT", "/favorites")
}

/// Rejects GET on a single favorites entry
pub async fn get_favorite_unsupported() -> HttpResponse {
    operation_not_supported("GET", "/favorites/{campsiteId}")
}

/// Rejects PUT on a single favorites entry
pub async fn put_favorite_unsupported() -> HttpResponse {
    operation_not_supported("PUT", "/favorites/{campsiteId}")
}

fn operation_not_supported(verb: &str, path: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "error": "operation_not_supported",
        "message": format!("{} operation not supported on {}", verb, path)
    }))
}
