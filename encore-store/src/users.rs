use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use encore_domain::{StoreError, User, UserDirectory};

/// In-memory account directory, populated once at startup
pub struct MemoryUserDirectory {
    by_username: HashMap<String, User>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            by_username: users.into_iter().map(|u| (u.username.clone(), u)).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .by_username
            .get(username)
            .filter(|u| u.password == password)
            .cloned())
    }

    async fn find(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.by_username.values().find(|u| u.id == id).cloned())
    }
}
