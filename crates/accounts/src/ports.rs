//! Capability ports the account service composes.
//!
//! Each port is an abstract collaborator owned by another system: the durable
//! account store, the access-control service ("who can do what"), the billing
//! provider, and the identity directory. The service takes all four as
//! explicit constructor parameters so tests can supply fakes directly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use teamspace_core::{AccountId, DomainError, RequestContext, UserId};

use crate::account::{Account, AccountPatch, CustomerId};
use crate::roles::{AccountAction, Membership, Role};

/// Account store operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account not found")]
    NotFound,

    #[error("store failure: {0}")]
    Backend(String),
}

/// Access-control operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("membership not found")]
    NotFound,

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("access-control failure: {0}")]
    Backend(String),
}

/// Billing provider operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("{0}")]
    Provider(String),
}

/// Identity directory operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("directory failure: {0}")]
    Backend(String),
}

// Port failures that the service does not wrap with a specific message
// surface as BadRequest with the port's own reason string.
impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        DomainError::bad_request(e.to_string())
    }
}

impl From<AccessError> for DomainError {
    fn from(e: AccessError) -> Self {
        DomainError::bad_request(e.to_string())
    }
}

impl From<BillingError> for DomainError {
    fn from(e: BillingError) -> Self {
        DomainError::bad_request(e.to_string())
    }
}

impl From<DirectoryError> for DomainError {
    fn from(e: DirectoryError) -> Self {
        DomainError::bad_request(e.to_string())
    }
}

/// Durable store of account records.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Allocate a fresh account id. The id is known before the row exists,
    /// which lets the service correlate it with the billing customer.
    fn new_id(&self) -> AccountId;

    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Fetch exactly the accounts in `ids` (missing ids are skipped).
    async fn get_many(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError>;

    async fn insert(&self, account: Account) -> Result<Account, StoreError>;

    /// Apply a partial update and return the persisted record.
    async fn update(&self, id: AccountId, patch: AccountPatch) -> Result<Account, StoreError>;

    async fn remove(&self, id: AccountId) -> Result<(), StoreError>;
}

/// Membership tracking and permission decisions for account resources.
///
/// This port is account-scoped by construction; accounts are the only
/// resource type this core manages.
#[async_trait]
pub trait AccessControl: Send + Sync {
    /// All memberships the calling session holds on accounts.
    async fn my_memberships(&self, ctx: &RequestContext)
        -> Result<Vec<Membership>, AccessError>;

    /// Whether the caller may perform `action` on every one of `account_ids`.
    async fn can_i(
        &self,
        ctx: &RequestContext,
        account_ids: &[AccountId],
        action: AccountAction,
    ) -> Result<bool, AccessError>;

    /// All memberships held on one account.
    async fn resource_memberships(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
    ) -> Result<Vec<Membership>, AccessError>;

    async fn add_membership(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        account_id: AccountId,
        role: Role,
    ) -> Result<(), AccessError>;

    /// Atomically replace a user's role on an account.
    async fn set_membership_role(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
        user_id: UserId,
        role: Role,
    ) -> Result<(), AccessError>;

    async fn remove_membership(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<(), AccessError>;

    /// Bulk teardown of every membership on an account.
    async fn remove_resource(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
    ) -> Result<(), AccessError>;
}

/// A payment-collection intent issued by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupIntent {
    pub id: String,
    pub client_secret: String,
}

/// External billing provider (Stripe-like).
#[async_trait]
pub trait BillingProvider: Send + Sync {
    async fn create_customer(
        &self,
        account_id: AccountId,
        payment_method: Option<&str>,
    ) -> Result<CustomerId, BillingError>;

    async fn delete_customer(&self, customer_id: &CustomerId) -> Result<(), BillingError>;

    async fn setup_intent(&self) -> Result<SetupIntent, BillingError>;
}

/// A user known to the identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: UserId,
    pub email: String,
}

/// External identity service: resolves users by email, sends invitations.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_by_email(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Option<DirectoryUser>, DirectoryError>;

    /// Invite a signup by email, creating the user if needed. Returns the
    /// invited user's id.
    async fn invite_signup(
        &self,
        ctx: &RequestContext,
        email: &str,
        name: &str,
    ) -> Result<UserId, DirectoryError>;
}
