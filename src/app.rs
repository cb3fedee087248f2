use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::state::AppState;
use crate::{auth, posts, profiles};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(auth::router())
                .merge(profiles::router())
                .merge(posts::router())
                .route("/health", get(|| async { "ok" })),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        extract::FromRef,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::{jwt::JwtKeys, repo_types::NewUser};

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn user_with_token(state: &AppState, name: &str) -> (Uuid, String) {
        let email = format!("{}@example.com", name.to_lowercase());
        let user = state
            .users
            .create(NewUser {
                name,
                email: &email,
                password_hash: "$argon2id$stub",
                avatar: None,
            })
            .await
            .unwrap();
        let token = JwtKeys::from_ref(state).sign_access(user.id).unwrap();
        (user.id, token)
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_app(AppState::for_tests());
        let res = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn posts_require_a_token() {
        let app = build_app(AppState::for_tests());
        let (status, body) = send(&app, Method::GET, "/api/posts", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "No token, authorization denied");

        let (status, _) = send(&app, Method::POST, "/api/posts", None, Some(json!({ "text": "hi" }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn post_like_and_delete_over_http() {
        let state = AppState::for_tests();
        let app = build_app(state.clone());
        let (ada, ada_token) = user_with_token(&state, "Ada").await;
        let (_, bob_token) = user_with_token(&state, "Bob").await;

        let (status, post) = send(&app, Method::POST, "/api/posts", Some(&ada_token), Some(json!({ "text": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(post["user"], ada.to_string());
        let id = post["id"].as_str().unwrap().to_string();

        let like_uri = format!("/api/posts/like/{id}");
        let (status, likes) = send(&app, Method::PUT, &like_uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(likes.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::PUT, &like_uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Post already liked");

        let (status, body) = send(&app, Method::PUT, &format!("/api/posts/unlike/{id}"), Some(&ada_token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["msg"], "Post has not yet been liked");

        let post_uri = format!("/api/posts/{id}");
        let (status, body) = send(&app, Method::DELETE, &post_uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["msg"], "User not authorized");
        let (status, _) = send(&app, Method::GET, &post_uri, Some(&bob_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::DELETE, &post_uri, Some(&ada_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msg"], "Post was removed");
        let (status, body) = send(&app, Method::GET, &post_uri, Some(&ada_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["msg"], "Post not found");
    }

    #[tokio::test]
    async fn empty_comment_returns_error_array() {
        let state = AppState::for_tests();
        let app = build_app(state.clone());
        let (_, token) = user_with_token(&state, "Ada").await;

        let (_, post) = send(&app, Method::POST, "/api/posts", Some(&token), Some(json!({ "text": "hello" }))).await;
        let uri = format!("/api/posts/comment/{}", post["id"].as_str().unwrap());
        let (status, body) = send(&app, Method::POST, &uri, Some(&token), Some(json!({ "text": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["errors"].as_array().unwrap();
        assert!(errors.iter().any(|e| e["msg"] == "Text is require"));
        assert_eq!(errors[0]["param"], "text");
        assert_eq!(errors[0]["location"], "body");
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests_with_json_errors() {
        let state = AppState::for_tests();
        let app = build_app(state.clone());
        let (_, token) = user_with_token(&state, "Ada").await;

        let (status, body) = send(&app, Method::POST, "/api/posts", Some(&token), Some(json!({ "text": 5 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["msg"].as_str().unwrap().contains("deserialize"));

        let (status, body) = send(&app, Method::POST, "/api/auth/refresh", None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["msg"].as_str().unwrap().contains("refresh_token"));

        let req = Request::post("/api/posts")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(r#"{"text":"hi"}"#))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["msg"].as_str().unwrap().contains("Content-Type"));

        let (status, posts) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(posts.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn register_login_and_profile_over_http() {
        let app = build_app(AppState::for_tests());
        let (status, reg) = send(
            &app,
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(reg.get("password_hash").is_none());

        let (status, login) = send(
            &app,
            Method::POST,
            "/api/auth",
            None,
            Some(json!({ "email": "ada@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = login["access_token"].as_str().unwrap().to_string();

        let (status, me) = send(&app, Method::GET, "/api/auth", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["name"], "Ada");

        let (status, profile) = send(
            &app,
            Method::POST,
            "/api/profile",
            Some(&token),
            Some(json!({ "status": "Developer", "skills": "rust, sql", "twitter": "https://twitter.com/ada" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["user"]["name"], "Ada");
        assert_eq!(profile["skills"], json!(["rust", "sql"]));
        assert_eq!(profile["social"]["twitter"], "https://twitter.com/ada");

        let (status, body) = send(&app, Method::DELETE, "/api/profile", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["msg"], "User deleted");

        let (status, _) = send(&app, Method::GET, "/api/profile/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
