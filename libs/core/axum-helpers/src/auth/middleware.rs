use super::jwt::JwtAuth;
use crate::errors::AppError;
use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

/// Server-side record of issued access tokens.
///
/// A verified token whose session has been removed (logout, refresh) is
/// rejected.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn is_active(&self, user_id: Uuid, access_token: &str) -> Result<bool, AppError>;
}

/// The raw bearer token of the current request.
#[derive(Debug, Clone)]
pub struct AccessToken(pub String);

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtAuth,
    pub sessions: Option<Arc<dyn SessionStore>>,
}

impl AuthState {
    pub fn new(jwt: JwtAuth, sessions: Option<Arc<dyn SessionStore>>) -> Self {
        Self { jwt, sessions }
    }

    /// Signature and expiry checks only.
    pub fn stateless(jwt: JwtAuth) -> Self {
        Self::new(jwt, None)
    }
}

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.trim().to_string()))
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token").then(|| value.to_string())
                    })
                })
        })
}

/// Verifies the access token and puts [`super::JwtClaims`] and
/// [`AccessToken`] into the request extensions.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/doors", post(create_door))
///     .layer(axum::middleware::from_fn_with_state(auth_state, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token_from_request(request.headers()).ok_or_else(|| {
        tracing::debug!("No JWT found in Authorization header or cookie");
        AppError::Unauthorized("No token provided".to_string())
    })?;

    let claims = auth.jwt.verify_access_token(&token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    if let Some(sessions) = &auth.sessions {
        if !sessions.is_active(claims.sub, &token).await? {
            tracing::debug!(user_id = %claims.sub, "Token has no active session");
            return Err(AppError::Unauthorized("Token has been revoked".to_string()));
        }
    }

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(AccessToken(token));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{JwtConfig, RoleClaim};
    use crate::extractors::{AdminUser, AuthUser};
    use axum::{Router, body::Body, http::{self, StatusCode}, middleware, routing::get};
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct RevokedStore(Mutex<Vec<String>>);

    #[async_trait]
    impl SessionStore for RevokedStore {
        async fn is_active(&self, _user_id: Uuid, access_token: &str) -> Result<bool, AppError> {
            Ok(!self.0.lock().unwrap().iter().any(|t| t == access_token))
        }
    }

    fn jwt() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(
            "access-secret-access-secret-access-secret",
            "refresh-secret-refresh-secret-refresh-secret",
        ))
    }

    fn app(state: AuthState) -> Router {
        Router::new()
            .route("/me", get(|AuthUser(claims): AuthUser| async move { claims.sub.to_string() }))
            .route("/admin", get(|_: AdminUser| async { "ok" }))
            .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
    }

    fn get_with(uri: &str, header: Option<(&str, String)>) -> Request {
        let mut builder = http::Request::builder().uri(uri);
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(AuthState::stateless(jwt()))
            .oneshot(get_with("/me", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bearer_and_cookie_tokens_accepted() {
        let jwt = jwt();
        let pair = jwt.issue_pair(Uuid::now_v7(), &[]).unwrap();

        let response = app(AuthState::stateless(jwt.clone()))
            .oneshot(get_with("/me", Some(("authorization", format!("Bearer {}", pair.access_token)))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(AuthState::stateless(jwt))
            .oneshot(get_with("/me", Some(("cookie", format!("theme=dark; access_token={}", pair.access_token)))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_revoked_session_rejected() {
        let jwt = jwt();
        let pair = jwt.issue_pair(Uuid::now_v7(), &[]).unwrap();
        let store = Arc::new(RevokedStore(Mutex::new(vec![pair.access_token.clone()])));

        let response = app(AuthState::new(jwt, Some(store)))
            .oneshot(get_with("/me", Some(("authorization", format!("Bearer {}", pair.access_token)))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_route_requires_admin_role() {
        let jwt = jwt();
        let user = jwt.issue_pair(Uuid::now_v7(), &[RoleClaim { title: "user".into(), priority: 1 }]).unwrap();
        let admin = jwt.issue_pair(Uuid::now_v7(), &[RoleClaim { title: "admin".into(), priority: 2 }]).unwrap();

        let response = app(AuthState::stateless(jwt.clone()))
            .oneshot(get_with("/admin", Some(("authorization", format!("Bearer {}", user.access_token)))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app(AuthState::stateless(jwt))
            .oneshot(get_with("/admin", Some(("authorization", format!("Bearer {}", admin.access_token)))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
