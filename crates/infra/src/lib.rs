//! In-memory adapters for the account service's capability ports (dev/test
//! wiring). Real deployments swap these for persistent/provider-backed
//! implementations behind the same traits.

pub mod access_control;
pub mod account_store;
pub mod billing;
pub mod directory;


pub use access_control::InMemoryAccessControl;
pub use account_store::InMemoryAccountStore;
pub use billing::InMemoryBillingProvider;
pub use directory::InMemoryDirectory;
