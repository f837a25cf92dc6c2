/*
Notification Controller

REST endpoints for the notification feed. Handles HTTP concerns only:
identity extraction, query parsing and error-to-status mapping. Business
logic lives in the NotificationFeedService.

Identity comes from the x-user-id header, standing in for the session
layer at this boundary. A request without a parseable identity is rejected
before any store access.
*/

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::application::service::feed_service::{
    FeedPage, GetAllInput, NotificationFeedService, RequestContext,
};
use crate::domain::services::resolver::EnrichedNotification;
use crate::error::FeedError;

const IDENTITY_HEADER: &str = "x-user-id";

/// Feed page query parameters.
#[derive(Debug, Deserialize)]
pub struct GetAllQuery {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
    pub cursor: Option<i64>,
    pub read: Option<bool>,
}

/// Error response DTO
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: String, code: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse { error, code }),
        }
    }
}

/// Convert FeedError to HTTP status code and error response
fn feed_error_to_response(error: FeedError) -> (StatusCode, Json<ApiResponse<()>>) {
    let (status, code) = match error {
        FeedError::UnrecognizedKind(_) => (StatusCode::INTERNAL_SERVER_ERROR, "UNRECOGNIZED_KIND"),
        FeedError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
        FeedError::AuthenticationRequired => (StatusCode::UNAUTHORIZED, "AUTH_REQUIRED"),
        FeedError::NotificationNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        FeedError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "STORE_ERROR"),
    };

    (
        status,
        Json(ApiResponse::error(error.to_string(), code.to_string())),
    )
}

/// Derive the authenticated identity from the request headers.
fn require_identity(headers: &HeaderMap) -> Result<RequestContext, FeedError> {
    let recipient_id = headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or(FeedError::AuthenticationRequired)?;

    Ok(RequestContext::new(recipient_id))
}

/// Fetch one page of the caller's feed
async fn get_all(
    State(service): State<Arc<NotificationFeedService>>,
    headers: HeaderMap,
    Query(query): Query<GetAllQuery>,
) -> Result<Json<ApiResponse<FeedPage>>, (StatusCode, Json<ApiResponse<()>>)> {
    let ctx = require_identity(&headers).map_err(feed_error_to_response)?;

    let limit = query
        .limit
        .ok_or_else(|| FeedError::Validation("limit is required".into()))
        .map_err(feed_error_to_response)?;

    let input = GetAllInput {
        limit,
        skip: query.skip,
        cursor: query.cursor,
        read: query.read,
    };

    match service.get_all(&ctx, input).await {
        Ok(page) => Ok(Json(ApiResponse::success(page))),
        Err(error) => Err(feed_error_to_response(error)),
    }
}

/// Count the caller's unread notifications
async fn count_unread(
    State(service): State<Arc<NotificationFeedService>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<u64>>, (StatusCode, Json<ApiResponse<()>>)> {
    let ctx = require_identity(&headers).map_err(feed_error_to_response)?;

    match service.count_unread(&ctx).await {
        Ok(count) => Ok(Json(ApiResponse::success(count))),
        Err(error) => Err(feed_error_to_response(error)),
    }
}

/// Mark one notification as read
async fn mark_as_read(
    State(service): State<Arc<NotificationFeedService>>,
    headers: HeaderMap,
    Path(notification_id): Path<i64>,
) -> Result<Json<ApiResponse<EnrichedNotification>>, (StatusCode, Json<ApiResponse<()>>)> {
    let ctx = require_identity(&headers).map_err(feed_error_to_response)?;

    match service.mark_as_read(&ctx, notification_id).await {
        Ok(notification) => Ok(Json(ApiResponse::success(notification))),
        Err(error) => Err(feed_error_to_response(error)),
    }
}

/// Create the notification routes
pub fn create_notification_routes(service: Arc<NotificationFeedService>) -> Router {
    Router::new()
        .route("/notifications", get(get_all))
        .route("/notifications/unreads", get(count_unread))
        .route("/notifications/:id/read", post(mark_as_read))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::storage::notification_store::NotificationStore;
    use crate::domain::entities::notification::{NewNotification, NotificationKind};
    use crate::infrastructure::repositories::sqlite_notification_repository::{
        SqliteConfig, SqliteNotificationRepository,
    };
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn app_with_seed() -> Router {
        let repo = SqliteNotificationRepository::with_config(SqliteConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
        .expect("in-memory repository");

        let mut new = NewNotification::new(NotificationKind::Like, 7);
        new.actor_id = Some(42);
        new.post_id = Some(99);
        new.post_title = "Hello".to_string();
        repo.create(new).await.unwrap();

        create_notification_routes(Arc::new(NotificationFeedService::new(Arc::new(repo))))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let app = app_with_seed().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn feed_page_round_trip() {
        let app = app_with_seed().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications?limit=10")
                    .header(IDENTITY_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        let list = json["data"]["list"].as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["message"], "liked your post Hello");
        assert_eq!(list[0]["href"], "/users/42");
        assert_eq!(json["data"]["next_cursor"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn missing_limit_is_a_validation_error() {
        let app = app_with_seed().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications")
                    .header(IDENTITY_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION");
    }

    #[tokio::test]
    async fn mark_as_read_and_unread_count() {
        let app = app_with_seed().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notifications/1/read")
                    .header(IDENTITY_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["read"], true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/notifications/unreads")
                    .header(IDENTITY_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"], 0);
    }

    #[tokio::test]
    async fn unknown_notification_is_not_found() {
        let app = app_with_seed().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/notifications/404/read")
                    .header(IDENTITY_HEADER, "7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
