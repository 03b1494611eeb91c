/*
 * Responsibility
 * - v1 URL layout
 * - /health is public; everything else sits behind the bearer guard
 * - Per-route permissions are attached here with permission::require
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    health::health,
    me::me,
    messages::{create_message, list_messages},
};
use crate::middleware::auth::{bearer, permission};
use crate::state::AppState;

pub const READ_MESSAGES: &str = "read:messages";
pub const WRITE_MESSAGES: &str = "write:messages";

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let protected = Router::new().route("/me", get(me)).route(
        "/messages",
        permission::require(get(list_messages), READ_MESSAGES)
            .merge(permission::require(post(create_message), WRITE_MESSAGES)),
    );

    public.merge(bearer::apply(protected, state))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::tests::{claims_with_permissions, sign, static_verifier};

    fn app() -> Router {
        let state = AppState::new(Arc::new(static_verifier()));
        routes(state.clone()).with_state(state)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_as(uri: &str, permissions: &[&str]) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", sign(&claims_with_permissions(permissions))),
            )
            .body(Body::empty())
            .unwrap()
    }

    fn post_as(uri: &str, permissions: &[&str], body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", sign(&claims_with_permissions(permissions))),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(&app(), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn me_requires_credentials() {
        let req = Request::builder().uri("/me").body(Body::empty()).unwrap();

        let (status, body) = send(&app(), req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "No credentials");
    }

    #[tokio::test]
    async fn me_returns_subject_and_permissions() {
        let (status, body) = send(&app(), get_as("/me", &["read:messages"])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "sub": "user-1", "permissions": ["read:messages"] })
        );
    }

    #[tokio::test]
    async fn reading_messages_needs_read_permission() {
        let app = app();

        let (denied, _) = send(&app, get_as("/messages", &["write:messages"])).await;
        let (allowed, body) = send(&app, get_as("/messages", &[READ_MESSAGES])).await;

        assert_eq!(denied, StatusCode::FORBIDDEN);
        assert_eq!(allowed, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn writer_creates_and_reader_lists() {
        let app = app();

        let (status, created) = send(
            &app,
            post_as("/messages", &[WRITE_MESSAGES], json!({ "text": " hello " })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["text"], "hello");
        assert_eq!(created["author"], "user-1");

        let (_, listed) = send(&app, get_as("/messages", &[READ_MESSAGES])).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], 1);
    }

    #[tokio::test]
    async fn reader_cannot_write() {
        let (status, body) = send(
            &app(),
            post_as("/messages", &[READ_MESSAGES], json!({ "text": "hi" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn empty_message_is_bad_request() {
        let (status, body) = send(
            &app(),
            post_as("/messages", &[WRITE_MESSAGES], json!({ "text": "  " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_MESSAGE");
    }
}
