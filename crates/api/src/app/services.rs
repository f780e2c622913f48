//! Service wiring over the in-memory adapters.

use std::sync::Arc;

use teamspace_accounts::AccountService;
use teamspace_infra::{
    InMemoryAccessControl, InMemoryAccountStore, InMemoryBillingProvider, InMemoryDirectory,
};

pub struct AppServices {
    pub accounts: AccountService,
    /// When set, billing updates use the dev sentinel customer instead of
    /// calling the provider. Driven by `SKIP_STRIPE` in the environment.
    pub skip_stripe: bool,
}

pub fn build_services() -> AppServices {
    let store = Arc::new(InMemoryAccountStore::new());
    let access = Arc::new(InMemoryAccessControl::new());
    let billing = Arc::new(InMemoryBillingProvider::new());
    let directory = Arc::new(InMemoryDirectory::new());

    let skip_stripe = std::env::var("SKIP_STRIPE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    AppServices {
        accounts: AccountService::new(store, access, billing, directory),
        skip_stripe,
    }
}
