use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use teamspace_accounts::{Account, AccountPatch, AccountStore, StoreError};
use teamspace_core::AccountId;

/// In-memory account store for dev/test wiring.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<AccountId, Account>>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<AccountId, Account>>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    fn new_id(&self) -> AccountId {
        AccountId::new()
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        let map = self.read()?;
        Ok(ids.iter().filter_map(|id| map.get(id).cloned()).collect())
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        self.write()?.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, id: AccountId, patch: AccountPatch) -> Result<Account, StoreError> {
        let mut map = self.write()?;
        let account = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply(account);
        Ok(account.clone())
    }

    async fn remove(&self, id: AccountId) -> Result<(), StoreError> {
        self.write()?.remove(&id);
        Ok(())
    }
}
