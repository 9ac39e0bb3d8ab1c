//! In-memory user store using a Tokio read-write lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use acta_core::{AppError, AppResult};
use acta_entity::user::{CreateUser, ProfileUpdate, User};

use crate::traits::UserStore;

/// In-memory [`UserStore`] suitable for tests and single-node development.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    /// User ID → record.
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pre-built user record directly, bypassing creation checks.
    ///
    /// Test fixture hook; production users go through [`UserStore::create`].
    pub async fn insert_raw(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let needle = email.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let mut users = self.users.write().await;

        let needle = user.email.to_lowercase();
        if users.values().any(|u| u.email.to_lowercase() == needle) {
            return Err(AppError::email_already_exists(format!(
                "A user with email '{}' already exists",
                user.email
            )));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            workspace: user.workspace,
            password_hash: user.password_hash.clone(),
            is_active: true,
            last_login_at: None,
            preferences: serde_json::Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
            created_by: user.created_by,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(&id) {
            user.last_login_at = Some(at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;
        match users.get_mut(&update.id) {
            Some(user) => {
                if let Some(name) = &update.full_name {
                    user.full_name = name.clone();
                }
                if let Some(prefs) = &update.preferences {
                    user.preferences = prefs.clone();
                }
                user.updated_at = Utc::now();
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = Some(password_hash.to_string());
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::not_found("User not found")),
        }
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<()> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                user.updated_at = Utc::now();
                Ok(())
            }
            None => Err(AppError::not_found("User not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acta_entity::user::{Role, Workspace};

    fn create_input(email: &str) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            full_name: "Test User".to_string(),
            role: Role::CommissionMember,
            workspace: Workspace::Administration,
            password_hash: Some("$argon2id$fake".to_string()),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email_is_case_insensitive() {
        let store = MemoryUserStore::new();
        store.create(&create_input("Alice@Example.org")).await.unwrap();

        let found = store.find_by_email("alice@example.org").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().email, "Alice@Example.org");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.create(&create_input("dup@example.org")).await.unwrap();

        let err = store
            .create(&create_input("DUP@example.org"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, acta_core::ErrorKind::EmailAlreadyExists);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_profile_touches_name_and_preferences_only() {
        let store = MemoryUserStore::new();
        let user = store.create(&create_input("p@example.org")).await.unwrap();

        let updated = store
            .update_profile(&ProfileUpdate {
                id: user.id,
                full_name: Some("New Name".to_string()),
                preferences: Some(serde_json::json!({"lang": "ca"})),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.full_name, "New Name");
        assert_eq!(updated.preferences["lang"], "ca");
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.role, user.role);
    }

    #[tokio::test]
    async fn test_update_profile_missing_user_is_none() {
        let store = MemoryUserStore::new();
        let result = store
            .update_profile(&ProfileUpdate {
                id: Uuid::new_v4(),
                full_name: Some("x".to_string()),
                preferences: None,
            })
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
