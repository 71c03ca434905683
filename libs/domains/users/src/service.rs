use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum_helpers::{AppError, JwtAuth, RoleClaim, SessionStore};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AuthError, AuthResult};
use crate::models::{Role, SignInRequest, SignUpRequest, SuccessResponse, TokenPair, User, USER_ROLE};
use crate::repository::UserRepository;

/// Sign-up, sign-in and token lifecycle.
///
/// Every issued pair is stored; a pair stops working once it is removed by
/// logout or replaced by refresh.
#[derive(Clone)]
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    jwt: JwtAuth,
}

impl<R: UserRepository + 'static> AuthService<R> {
    pub fn new(repository: R, jwt: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            jwt,
        }
    }

    /// Session lookup for the JWT middleware, backed by the same repository.
    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        Arc::new(RepositorySessionStore {
            repository: self.repository.clone(),
        })
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn sign_up(&self, input: SignUpRequest) -> AuthResult<TokenPair> {
        input
            .validate()
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.repository.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::DuplicateEmail(input.email));
        }

        let role = self
            .repository
            .find_role(USER_ROLE)
            .await?
            .ok_or_else(|| AuthError::MissingRole(USER_ROLE.to_string()))?;

        let user = User::new(input.email, hash_password(&input.password)?);
        let tokens = self.issue(user.id, std::slice::from_ref(&role))?;

        let user = self
            .repository
            .create_account(user, role, tokens.clone())
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(tokens)
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn sign_in(&self, input: SignInRequest) -> AuthResult<TokenPair> {
        let user = self
            .repository
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let roles = self.repository.roles_of(user.id).await?;
        let tokens = self.issue(user.id, &roles)?;
        self.repository.save_session(user.id, tokens.clone()).await?;

        tracing::info!(user_id = %user.id, "User signed in");
        Ok(tokens)
    }

    /// Removes the caller's pair. Both tokens must belong to the same stored
    /// session.
    #[instrument(skip(self, access_token, refresh_token))]
    pub async fn logout(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AuthResult<SuccessResponse> {
        if !self
            .repository
            .session_exists(user_id, access_token, refresh_token)
            .await?
        {
            return Err(AuthError::SessionNotFound);
        }

        self.repository.remove_session(user_id, refresh_token).await?;
        Ok(SuccessResponse { success: true })
    }

    /// Exchanges a refresh token for a new pair; the old pair is dropped.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.jwt.verify_refresh_token(refresh_token).map_err(|e| {
            tracing::debug!("Refresh token rejected: {}", e);
            AuthError::InvalidRefreshToken
        })?;

        if self
            .repository
            .find_session_by_refresh(refresh_token)
            .await?
            .is_none()
        {
            return Err(AuthError::RefreshTokenNotFound);
        }

        let user = self
            .repository
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound(claims.sub))?;

        let roles = self.repository.roles_of(user.id).await?;
        let tokens = self.issue(user.id, &roles)?;
        self.repository
            .rotate_session(user.id, refresh_token, tokens.clone())
            .await?;

        Ok(tokens)
    }

    fn issue(&self, user_id: Uuid, roles: &[Role]) -> AuthResult<TokenPair> {
        let claims: Vec<RoleClaim> = roles.iter().map(RoleClaim::from).collect();
        Ok(self.jwt.issue_pair(user_id, &claims)?)
    }
}

struct RepositorySessionStore<R> {
    repository: Arc<R>,
}

#[async_trait]
impl<R: UserRepository> SessionStore for RepositorySessionStore<R> {
    async fn is_active(&self, user_id: Uuid, access_token: &str) -> Result<bool, AppError> {
        Ok(self
            .repository
            .access_token_active(user_id, access_token)
            .await?)
    }
}

fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
