use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::models::{Role, Session, TokenPair, User};

/// Storage for accounts, their roles and issued token pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    async fn find_role(&self, title: &str) -> AuthResult<Option<Role>>;

    /// Roles granted to the user, highest priority first.
    async fn roles_of(&self, user_id: Uuid) -> AuthResult<Vec<Role>>;

    /// Creates the user, links `role` and stores the first session in one
    /// transaction.
    async fn create_account(&self, user: User, role: Role, tokens: TokenPair) -> AuthResult<User>;

    async fn save_session(&self, user_id: Uuid, tokens: TokenPair) -> AuthResult<()>;

    async fn find_session_by_refresh(&self, refresh_token: &str) -> AuthResult<Option<Session>>;

    async fn session_exists(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AuthResult<bool>;

    async fn access_token_active(&self, user_id: Uuid, access_token: &str) -> AuthResult<bool>;

    /// Replaces the session holding `old_refresh` with `tokens`.
    async fn rotate_session(
        &self,
        user_id: Uuid,
        old_refresh: &str,
        tokens: TokenPair,
    ) -> AuthResult<()>;

    async fn remove_session(&self, user_id: Uuid, refresh_token: &str) -> AuthResult<bool>;
}

#[derive(Debug, Default)]
struct Store {
    users: HashMap<Uuid, User>,
    roles: Vec<Role>,
    user_roles: HashMap<Uuid, Vec<i32>>,
    sessions: Vec<Session>,
}

/// In-memory implementation seeded with the `user` and `admin` roles.
#[derive(Debug, Clone)]
pub struct InMemoryUserRepository {
    store: Arc<RwLock<Store>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        let store = Store {
            roles: vec![
                Role {
                    id: 1,
                    title: "user".to_string(),
                    priority: 1,
                },
                Role {
                    id: 2,
                    title: "admin".to_string(),
                    priority: 2,
                },
            ],
            ..Store::default()
        };
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Grants an existing role; used to provision admins.
    pub async fn grant_role(&self, user_id: Uuid, title: &str) -> AuthResult<()> {
        let mut store = self.store.write().await;
        let role_id = store
            .roles
            .iter()
            .find(|r| r.title == title)
            .map(|r| r.id)
            .ok_or_else(|| AuthError::MissingRole(title.to_string()))?;

        let granted = store.user_roles.entry(user_id).or_default();
        if !granted.contains(&role_id) {
            granted.push(role_id);
        }
        Ok(())
    }

    /// Drops every role of the user; the account itself stays.
    pub async fn revoke_roles(&self, user_id: Uuid) {
        self.store.write().await.user_roles.remove(&user_id);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_role(&self, title: &str) -> AuthResult<Option<Role>> {
        let store = self.store.read().await;
        Ok(store.roles.iter().find(|r| r.title == title).cloned())
    }

    async fn roles_of(&self, user_id: Uuid) -> AuthResult<Vec<Role>> {
        let store = self.store.read().await;
        let Some(ids) = store.user_roles.get(&user_id) else {
            return Ok(Vec::new());
        };

        let mut roles: Vec<Role> = store
            .roles
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect();
        roles.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(roles)
    }

    async fn create_account(&self, user: User, role: Role, tokens: TokenPair) -> AuthResult<User> {
        let mut store = self.store.write().await;
        if store.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail(user.email));
        }

        store.user_roles.insert(user.id, vec![role.id]);
        store.sessions.push(Session::new(user.id, &tokens));
        store.users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn save_session(&self, user_id: Uuid, tokens: TokenPair) -> AuthResult<()> {
        self.store
            .write()
            .await
            .sessions
            .push(Session::new(user_id, &tokens));
        Ok(())
    }

    async fn find_session_by_refresh(&self, refresh_token: &str) -> AuthResult<Option<Session>> {
        let store = self.store.read().await;
        Ok(store
            .sessions
            .iter()
            .find(|s| s.refresh_token == refresh_token)
            .cloned())
    }

    async fn session_exists(
        &self,
        user_id: Uuid,
        access_token: &str,
        refresh_token: &str,
    ) -> AuthResult<bool> {
        let store = self.store.read().await;
        Ok(store.sessions.iter().any(|s| {
            s.user_id == user_id
                && s.access_token == access_token
                && s.refresh_token == refresh_token
        }))
    }

    async fn access_token_active(&self, user_id: Uuid, access_token: &str) -> AuthResult<bool> {
        let store = self.store.read().await;
        Ok(store
            .sessions
            .iter()
            .any(|s| s.user_id == user_id && s.access_token == access_token))
    }

    async fn rotate_session(
        &self,
        user_id: Uuid,
        old_refresh: &str,
        tokens: TokenPair,
    ) -> AuthResult<()> {
        let mut store = self.store.write().await;
        store.sessions.retain(|s| s.refresh_token != old_refresh);
        store.sessions.push(Session::new(user_id, &tokens));
        Ok(())
    }

    async fn remove_session(&self, user_id: Uuid, refresh_token: &str) -> AuthResult<bool> {
        let mut store = self.store.write().await;
        let before = store.sessions.len();
        store
            .sessions
            .retain(|s| !(s.user_id == user_id && s.refresh_token == refresh_token));

        let removed = store.sessions.len() < before;
        if removed {
            tracing::info!(user_id = %user_id, "Removed session");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(tag: &str) -> TokenPair {
        TokenPair {
            access_token: format!("access-{tag}"),
            refresh_token: format!("refresh-{tag}"),
        }
    }

    #[tokio::test]
    async fn test_create_account_links_role_and_session() {
        let repo = InMemoryUserRepository::new();
        let role = repo.find_role("user").await.unwrap().unwrap();
        let user = User::new("a@example.com".to_string(), "hash".to_string());

        let created = repo.create_account(user, role, pair("1")).await.unwrap();

        let roles = repo.roles_of(created.id).await.unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0].title, "user");
        assert!(repo
            .session_exists(created.id, "access-1", "refresh-1")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryUserRepository::new();
        let role = repo.find_role("user").await.unwrap().unwrap();

        repo.create_account(User::new("dup@example.com".into(), "h".into()), role.clone(), pair("1"))
            .await
            .unwrap();
        let err = repo
            .create_account(User::new("dup@example.com".into(), "h".into()), role, pair("2"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_roles_sorted_by_priority() {
        let repo = InMemoryUserRepository::new();
        let role = repo.find_role("user").await.unwrap().unwrap();
        let user = repo
            .create_account(User::new("admin@example.com".into(), "h".into()), role, pair("1"))
            .await
            .unwrap();
        repo.grant_role(user.id, "admin").await.unwrap();

        let titles: Vec<String> = repo
            .roles_of(user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["admin", "user"]);
    }

    #[tokio::test]
    async fn test_rotate_and_remove_session() {
        let repo = InMemoryUserRepository::new();
        let user_id = Uuid::now_v7();
        repo.save_session(user_id, pair("old")).await.unwrap();

        repo.rotate_session(user_id, "refresh-old", pair("new"))
            .await
            .unwrap();
        assert!(repo.find_session_by_refresh("refresh-old").await.unwrap().is_none());
        assert!(repo.access_token_active(user_id, "access-new").await.unwrap());

        assert!(repo.remove_session(user_id, "refresh-new").await.unwrap());
        assert!(!repo.remove_session(user_id, "refresh-new").await.unwrap());
    }
}
