//! Users domain: accounts, roles and JWT sessions.
//!
//! ```text
//! handlers ──► AuthService ──► UserRepository (in-memory | Postgres)
//!                  │
//!                  └──► JwtAuth (axum-helpers)
//! ```
//!
//! ```rust,no_run
//! use axum_helpers::{AuthState, JwtAuth, JwtConfig};
//! use domain_users::{handlers, AuthService, InMemoryUserRepository};
//!
//! let jwt = JwtAuth::new(&JwtConfig::new(
//!     "access-secret-at-least-32-characters!!",
//!     "refresh-secret-at-least-32-characters!",
//! ));
//! let service = AuthService::new(InMemoryUserRepository::new(), jwt.clone());
//! let auth = AuthState::new(jwt, Some(service.session_store()));
//! let router = handlers::router(service, auth);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{AuthError, AuthResult};
pub use handlers::ApiDoc;
pub use models::{
    LogoutRequest, RefreshRequest, Role, Session, SignInRequest, SignUpRequest, SuccessResponse,
    TokenPair, User, USER_ROLE,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::AuthService;
