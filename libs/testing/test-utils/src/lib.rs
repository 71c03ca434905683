//! Shared test utilities for the domain crates
//!
//! - `TestDatabase`: PostgreSQL container with all migrations applied (feature: "postgres")
//! - `TestAuth`: mints access tokens for handler tests
//! - `TestDataBuilder`: deterministic test data
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let email = builder.email("buyer");
//! }
//! ```

use axum_helpers::{AuthState, JwtAuth, JwtConfig, RoleClaim};
use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

const ACCESS_SECRET: &str = "test-access-secret-0123456789abcdef";
const REFRESH_SECRET: &str = "test-refresh-secret-0123456789abcdef";

/// JWT fixture sharing one key pair between the router under test and the
/// tokens the test sends.
#[derive(Clone)]
pub struct TestAuth {
    jwt: JwtAuth,
}

impl Default for TestAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAuth {
    pub fn new() -> Self {
        Self {
            jwt: JwtAuth::new(&Self::config()),
        }
    }

    pub fn config() -> JwtConfig {
        JwtConfig::new(ACCESS_SECRET, REFRESH_SECRET)
    }

    pub fn jwt(&self) -> JwtAuth {
        self.jwt.clone()
    }

    /// Middleware state without a session store.
    pub fn state(&self) -> AuthState {
        AuthState::stateless(self.jwt.clone())
    }

    pub fn user_token(&self, user_id: Uuid) -> String {
        self.token(user_id, &[("user", 1)])
    }

    pub fn admin_token(&self, user_id: Uuid) -> String {
        self.token(user_id, &[("user", 1), ("admin", 2)])
    }

    /// `Authorization` header value for `token`.
    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    fn token(&self, user_id: Uuid, roles: &[(&str, i32)]) -> String {
        let roles: Vec<RoleClaim> = roles
            .iter()
            .map(|(title, priority)| RoleClaim {
                title: title.to_string(),
                priority: *priority,
            })
            .collect();

        self.jwt
            .issue_pair(user_id, &roles)
            .expect("Failed to issue test token")
            .access_token
    }
}

/// Builder for test data with deterministic randomization
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_sign_up");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("door", "main"), "test-door-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    pub fn email(&self, local: &str) -> String {
        format!("{}-{}@example.com", local, self.seed)
    }
}
