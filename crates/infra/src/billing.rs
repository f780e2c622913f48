use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use teamspace_accounts::{BillingError, BillingProvider, CustomerId, SetupIntent};
use teamspace_core::AccountId;

/// In-memory billing provider for dev/test wiring.
///
/// Issues deterministic-looking customer/setup-intent ids and records every
/// create/delete so tests can assert on provider traffic.
#[derive(Debug, Default)]
pub struct InMemoryBillingProvider {
    seq: AtomicU64,
    created: Mutex<Vec<CustomerId>>,
    deleted: Mutex<Vec<CustomerId>>,
}

impl InMemoryBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Customers created so far, in order.
    pub fn created(&self) -> Vec<CustomerId> {
        self.created.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Customers deleted so far, in order.
    pub fn deleted(&self) -> Vec<CustomerId> {
        self.deleted.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn next(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl BillingProvider for InMemoryBillingProvider {
    async fn create_customer(
        &self,
        account_id: AccountId,
        _payment_method: Option<&str>,
    ) -> Result<CustomerId, BillingError> {
        let id = CustomerId::new(format!("cus_{}_{}", self.next(), account_id.as_uuid().simple()));
        self.created
            .lock()
            .map_err(|_| BillingError::Provider("billing lock poisoned".to_string()))?
            .push(id.clone());
        tracing::debug!(customer = %id, "billing customer created");
        Ok(id)
    }

    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<(), BillingError> {
        self.deleted
            .lock()
            .map_err(|_| BillingError::Provider("billing lock poisoned".to_string()))?
            .push(customer_id.clone());
        tracing::debug!(customer = %customer_id, "billing customer deleted");
        Ok(())
    }

    async fn setup_intent(&self) -> Result<SetupIntent, BillingError> {
        let n = self.next();
        Ok(SetupIntent {
            id: format!("seti_{n}"),
            client_secret: format!("seti_{n}_secret"),
        })
    }
}
