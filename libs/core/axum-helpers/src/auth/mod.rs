//! Authentication and authorization.
//!
//! - Access/refresh JWT pairs signed with separate secrets
//! - Middleware that verifies the access token and consults a [`SessionStore`]
//!
//! ```ignore
//! use axum_helpers::auth::{AuthState, JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let jwt = JwtAuth::new(&JwtConfig::from_env()?);
//! let auth = AuthState::new(jwt, Some(session_store));
//!
//! let protected = Router::new()
//!     .route("/logout", post(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, RoleClaim, TokenError, TokenPair};
pub use middleware::{AccessToken, AuthState, SessionStore, jwt_auth_middleware};
