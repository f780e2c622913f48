use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use teamspace_accounts::{Directory, DirectoryError, DirectoryUser};
use teamspace_core::{RequestContext, UserId};

/// In-memory identity directory for dev/test wiring.
///
/// Invitation delivery is out of scope; `invite_signup` just provisions the
/// user record the way the real identity service would after sending mail.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<String, UserId>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a user directly (test/bootstrap helper). Idempotent per
    /// email, same as `invite_signup`.
    pub fn register(&self, email: &str) -> UserId {
        let mut users = match self.users.write() {
            Ok(users) => users,
            Err(poisoned) => poisoned.into_inner(),
        };
        *users.entry(email.to_string()).or_insert_with(UserId::new)
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_by_email(
        &self,
        _ctx: &RequestContext,
        email: &str,
    ) -> Result<Option<DirectoryUser>, DirectoryError> {
        let users = self
            .users
            .read()
            .map_err(|_| DirectoryError::Backend("directory lock poisoned".to_string()))?;
        Ok(users.get(email).map(|id| DirectoryUser {
            id: *id,
            email: email.to_string(),
        }))
    }

    async fn invite_signup(
        &self,
        _ctx: &RequestContext,
        email: &str,
        name: &str,
    ) -> Result<UserId, DirectoryError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| DirectoryError::Backend("directory lock poisoned".to_string()))?;
        if let Some(id) = users.get(email) {
            return Ok(*id);
        }
        let id = UserId::new();
        users.insert(email.to_string(), id);
        tracing::debug!(email, name, "signup invited");
        Ok(id)
    }
}
