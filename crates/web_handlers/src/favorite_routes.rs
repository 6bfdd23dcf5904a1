use actix_web::web;

use auth_services::middleware::AuthMiddleware;

use crate::favorite_handlers::*;

/// Registers the favorites resource routes
///
/// Every operation is owner-scoped, so the whole scope sits behind the
/// bearer-token guard. Verb and path combinations outside the contract
/// answer 403 rather than 405.
pub fn favorite_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .wrap(AuthMiddleware)
            .route("", web::get().to(get_favorites))
            .route("", web::post().to(add_favorites))
            .route("", web::put().to(put_favorites_unsupported))
            .route("", web::delete().to(clear_favorites))
            .route("/{campsite_id}", web::get().to(get_favorite_unsupported))
            .route("/{campsite_id}", web::post().to(add_favorite))
            .route("/{campsite_id}", web::put().to(put_favorite_unsupported))
            .route("/{campsite_id}", web::delete().to(remove_favorite)),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use chrono::Utc;
    use uuid::Uuid;

    use auth_services::jwt::JwtService;
    use favorites::{Campsite, FavoritesService, InMemoryFavoritesStore};

    use super::*;

    fn sample_campsite(name: &str) -> Campsite {
        let now = Utc::now();
        Campsite {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "A quiet spot by the river".to_string(),
            elevation: 1250,
            cost_per_night: 35.0,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn auth_header(user_id: &Uuid) -> (&'static str, String) {
        let token = JwtService::new()
            .generate_access_token(user_id, "camper@example.com", "user")
            .expect("token generation should succeed");
        ("Authorization", format!("Bearer {token}"))
    }

    async fn seeded_store(count: usize) -> (Arc<InMemoryFavoritesStore>, Vec<Uuid>) {
        let store = Arc::new(InMemoryFavoritesStore::new());
        let mut ids = Vec::new();
        for i in 0..count {
            let campsite = sample_campsite(&format!("Campsite {i}"));
            ids.push(campsite.id);
            store.put_campsite(campsite).await;
        }
        (store, ids)
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/favorites").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "missing_token");
    }

    #[actix_web::test]
    async fn test_invalid_token_is_unauthorized() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/favorites")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "invalid_token");
    }

    #[actix_web::test]
    async fn test_get_favorites_returns_populated_list() {
        let (store, ids) = seeded_store(2).await;
        let service = FavoritesService::new(store);
        let owner = Uuid::new_v4();
        service
            .add_many(&owner, &[ids[0].to_string(), ids[1].to_string()])
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/favorites")
            .insert_header(auth_header(&owner))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["owner"], owner.to_string());
        assert_eq!(body["campsites"].as_array().unwrap().len(), 2);
        assert_eq!(body["campsites"][0]["name"], "Campsite 0");
        assert_eq!(body["campsites"][1]["id"], ids[1].to_string());
    }

    #[actix_web::test]
    async fn test_get_favorites_without_record_is_not_found() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/favorites")
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "favorites_not_found");
    }

    #[actix_web::test]
    async fn test_add_favorites_unions_batches() {
        let (store, ids) = seeded_store(3).await;
        let owner = Uuid::new_v4();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/favorites")
            .insert_header(auth_header(&owner))
            .set_json(vec![ids[0].to_string(), ids[1].to_string()])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/favorites")
            .insert_header(auth_header(&owner))
            .set_json(vec![ids[1].to_string(), ids[2].to_string()])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body["campsites"],
            serde_json::json!([ids[0], ids[1], ids[2]])
        );
    }

    #[actix_web::test]
    async fn test_add_favorite_reports_already_present() {
        let (store, ids) = seeded_store(1).await;
        let owner = Uuid::new_v4();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let uri = format!("/favorites/{}", ids[0]);
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(auth_header(&owner))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["already_present"], false);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(auth_header(&owner))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["already_present"], true);
        assert_eq!(body["favorites"]["campsites"], serde_json::json!([ids[0]]));
    }

    #[actix_web::test]
    async fn test_add_favorite_with_malformed_id_is_not_found() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/favorites/not-a-campsite-id")
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "invalid_campsite_id");
    }

    #[actix_web::test]
    async fn test_add_favorite_with_unknown_campsite_is_not_found() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/favorites/{}", Uuid::new_v4()))
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "campsite_not_found");
    }

    #[actix_web::test]
    async fn test_remove_favorite_returns_updated_record() {
        let (store, ids) = seeded_store(2).await;
        let service = FavoritesService::new(store);
        let owner = Uuid::new_v4();
        service
            .add_many(&owner, &[ids[0].to_string(), ids[1].to_string()])
            .await
            .unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/favorites/{}", ids[0]))
            .insert_header(auth_header(&owner))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["campsites"], serde_json::json!([ids[1]]));
    }

    #[actix_web::test]
    async fn test_remove_favorite_without_record_is_not_found() {
        let (store, ids) = seeded_store(1).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/favorites/{}", ids[0]))
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "favorites_not_found");
    }

    #[actix_web::test]
    async fn test_clear_favorites_returns_deleted_record() {
        let (store, ids) = seeded_store(1).await;
        let service = FavoritesService::new(store);
        let owner = Uuid::new_v4();
        service.add_one(&owner, &ids[0].to_string()).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(service))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/favorites")
            .insert_header(auth_header(&owner))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["campsites"], serde_json::json!([ids[0]]));

        let req = test::TestRequest::get()
            .uri("/favorites")
            .insert_header(auth_header(&owner))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_put_on_collection_is_forbidden() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/favorites")
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "PUT operation not supported on /favorites");
    }

    #[actix_web::test]
    async fn test_put_on_single_entry_is_forbidden() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/favorites/{}", Uuid::new_v4()))
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body["message"],
            "PUT operation not supported on /favorites/{campsiteId}"
        );
    }

    #[actix_web::test]
    async fn test_get_on_single_entry_is_forbidden() {
        let (store, _ids) = seeded_store(0).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(FavoritesService::new(store)))
                .configure(favorite_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/favorites/{}", Uuid::new_v4()))
            .insert_header(auth_header(&Uuid::new_v4()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(
            body["message"],
            "GET operation not supported on /favorites/{campsiteId}"
        );
    }
}
