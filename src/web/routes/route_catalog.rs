// Route table for the directory API.

pub mod admin;
pub mod public;

use super::auth::require_admin;
use super::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(public::health))
        .route("/api/channels", get(public::list).post(public::submit))
        .route("/api/channels/{id}", get(public::get_one))
        .route("/api/channels/{id}/votes", post(public::vote));

    let admin_routes = Router::new()
        .route(
            "/api/admin/channels",
            get(admin::queue)
                .post(admin::decide)
                .patch(admin::patch)
                .delete(admin::remove),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::listings::InMemoryListingStore;
    use crate::web::auth::tests::{token, SECRET};
    use crate::web::auth::{SessionVerifier, ADMIN_ROLE};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let store = Arc::new(InMemoryListingStore::new());
        router(AppState::new(store, SessionVerifier::new(SECRET)))
    }

    fn admin_token() -> String {
        token(ADMIN_ROLE, SECRET, 3600)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        bearer: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn submission(name: &str) -> Value {
        json!({
            "name": name,
            "link": format!("https://whatsapp.com/channel/{}", name),
            "description": "Ofertas diarias",
            "category": "tecnologia",
            "country": "mx",
            "email": "owner@example.com"
        })
    }

    async fn submit(app: &Router, name: &str) -> String {
        let (status, body) = send(app, Method::POST, "/api/channels", None, Some(submission(name))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn approve(app: &Router, id: &str) {
        let token = admin_token();
        let (status, _) = send(
            app,
            Method::POST,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": id, "action": "approve" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_submitted_listing_is_hidden_until_approved() {
        let app = app();
        let id = submit(&app, "ofertas").await;

        let (_, feed) = send(&app, Method::GET, "/api/channels", None, None).await;
        assert_eq!(feed.as_array().unwrap().len(), 0);
        let (status, body) = send(&app, Method::GET, &format!("/api/channels/{}", id), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        approve(&app, &id).await;

        let (_, feed) = send(&app, Method::GET, "/api/channels", None, None).await;
        assert_eq!(feed[0]["id"], json!(id));
        let (status, body) = send(&app, Method::GET, &format!("/api/channels/{}", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "approved");
    }

    #[tokio::test]
    async fn test_submission_errors() {
        let app = app();
        submit(&app, "repetido").await;

        let (status, body) =
            send(&app, Method::POST, "/api/channels", None, Some(submission("repetido"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "duplicate");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/channels",
            None,
            Some(json!({ "name": "sin enlace", "description": "d", "category": "c", "country": "es" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_votes() {
        let app = app();
        let id = submit(&app, "votos").await;
        let uri = format!("/api/channels/{}/votes", id);

        // Not approved yet
        let (status, _) = send(&app, Method::POST, &uri, None, Some(json!({ "stars": 5 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        approve(&app, &id).await;

        let (status, body) = send(&app, Method::POST, &uri, None, Some(json!({ "stars": 5 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "rating": 5.0, "total_votes": 1 }));

        let (_, body) = send(&app, Method::POST, &uri, None, Some(json!({ "stars": 3 }))).await;
        assert_eq!(body, json!({ "rating": 4.0, "total_votes": 2 }));

        let (status, _) = send(&app, Method::POST, &uri, None, Some(json!({ "stars": 6 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::POST, "/api/channels/not-an-id/votes", None, Some(json!({ "stars": 3 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_validation_errors() {
        let app = app();
        let id = submit(&app, "cuerpos").await;
        approve(&app, &id).await;
        let uri = format!("/api/channels/{}/votes", id);

        for body in [json!({ "stars": 4.5 }), json!({ "stars": "5" }), json!({})] {
            let (status, response) = send(&app, Method::POST, &uri, None, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"], "validation");
        }

        let token = admin_token();
        let (status, response) = send(
            &app,
            Method::PATCH,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": id, "verified": "yes" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "validation");

        // Nothing was folded in
        let (_, listing) = send(&app, Method::GET, &format!("/api/channels/{}", id), None, None).await;
        assert_eq!(listing["total_votes"], 0);
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin_token() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/admin/channels", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthorized");

        let viewer = token("viewer", SECRET, 3600);
        let (status, _) = send(&app, Method::GET, "/api/admin/channels", Some(viewer.as_str()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let forged = token(ADMIN_ROLE, "not-the-secret", 3600);
        let (status, _) = send(&app, Method::GET, "/api/admin/channels", Some(forged.as_str()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_queue_patch_and_remove() {
        let app = app();
        let token = admin_token();
        let kept = submit(&app, "queda").await;
        let rejected = submit(&app, "rechazado").await;
        approve(&app, &kept).await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": rejected, "action": "reject" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, queue) = send(&app, Method::GET, "/api/admin/channels", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(queue["pending"].as_array().unwrap().len(), 0);
        assert_eq!(queue["approved"][0]["id"], json!(kept));
        assert_eq!(queue["rejected"][0]["id"], json!(rejected));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": kept, "action": "archive" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        // Empty patch
        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": kept })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": kept, "rating": 3.14, "verified": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, listing) = send(&app, Method::GET, &format!("/api/channels/{}", kept), None, None).await;
        assert_eq!(listing["rating"], json!(3.1));
        assert_eq!(listing["verified"], true);

        // Out of range override leaves the flag untouched
        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": kept, "rating": 7.0, "verified": false })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, listing) = send(&app, Method::GET, &format!("/api/channels/{}", kept), None, None).await;
        assert_eq!(listing["verified"], true);

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": kept })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, &format!("/api/channels/{}", kept), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/admin/channels",
            Some(token.as_str()),
            Some(json!({ "channelId": kept })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
