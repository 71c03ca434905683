//! UUID path parameter extractor.

use crate::errors::{ErrorCode, ErrorResponse};
use axum::{
    Json,
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Parses a single `{id}` path segment into a [`Uuid`].
///
/// ```ignore
/// async fn get_door(UuidPath(id): UuidPath) -> String {
///     format!("Door ID: {}", id)
/// }
///
/// let app = Router::new().route("/doors/{id}", get(get_door));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        parse(&id).map(UuidPath)
    }
}

/// Parses two path segments, e.g. `/tables/{id}/rows/{row_id}`.
pub struct UuidPathPair(pub Uuid, pub Uuid);

impl<S> FromRequestParts<S> for UuidPathPair
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Ok(UuidPathPair(parse(&first)?, parse(&second)?))
    }
}

fn parse(raw: &str) -> Result<Uuid, Response> {
    Uuid::parse_str(raw).map_err(|_| invalid_uuid(raw))
}

fn invalid_uuid(raw: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            ErrorCode::InvalidUuid,
            format!("Invalid UUID: {}", raw),
        )),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    async fn echo(UuidPath(id): UuidPath) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn test_rejects_malformed_uuid() {
        let app = Router::new().route("/doors/{id}", get(echo));
        let response = app
            .oneshot(Request::builder().uri("/doors/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_accepts_valid_uuid() {
        let id = Uuid::now_v7();
        let app = Router::new().route("/doors/{id}", get(echo));
        let response = app
            .oneshot(Request::builder().uri(format!("/doors/{id}")).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn echo_pair(UuidPathPair(a, b): UuidPathPair) -> String {
        format!("{a}/{b}")
    }

    #[tokio::test]
    async fn test_pair_rejects_malformed_second_segment() {
        let app = Router::new().route("/tables/{id}/rows/{row_id}", get(echo_pair));
        let uri = format!("/tables/{}/rows/nope", Uuid::now_v7());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
