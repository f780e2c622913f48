use serde::{Deserialize, Serialize};

use teamspace_core::AccountId;

/// Sentinel billing customer id carried by robot accounts. Robot accounts
/// bypass the billing provider entirely, so this id must never reach it.
pub const ROBOT_CUSTOMER_ID: &str = "robot";

/// Sentinel billing customer id used when billing updates skip the real
/// provider (non-production environments). Sentinel customers are never sent
/// to the provider for deletion.
pub const DEV_CUSTOMER_ID: &str = "dev";

/// Provider-issued billing customer identifier (opaque).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this id is one of the sentinel customers that must never be
    /// handed to the real billing provider.
    pub fn is_sentinel(&self) -> bool {
        self.0 == DEV_CUSTOMER_ID || self.0 == ROBOT_CUSTOMER_ID
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Embedded billing record of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingProfile {
    pub stripe_customer_id: CustomerId,
    pub stripe_setup_intent_id: Option<String>,
    pub cardholder_name: Option<String>,
    pub address: Option<String>,
}

impl BillingProfile {
    /// The fixed sentinel profile persisted verbatim for robot accounts.
    pub fn robot() -> Self {
        Self {
            stripe_customer_id: CustomerId::new(ROBOT_CUSTOMER_ID),
            stripe_setup_intent_id: None,
            cardholder_name: Some("Robot".to_string()),
            address: Some("n/a".to_string()),
        }
    }
}

/// Buyer-supplied billing details, not yet tied to a provider customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub stripe_payment_method: Option<String>,
    pub stripe_setup_intent_id: Option<String>,
    pub cardholder_name: Option<String>,
    pub address: Option<String>,
}

impl BillingDetails {
    /// Merge these details with a provider customer id into the profile that
    /// gets persisted. Full replace: fields the caller did not resupply are
    /// not carried over from any previous profile.
    pub fn into_profile(self, customer_id: CustomerId) -> BillingProfile {
        BillingProfile {
            stripe_customer_id: customer_id,
            stripe_setup_intent_id: self.stripe_setup_intent_id,
            cardholder_name: self.cardholder_name,
            address: self.address,
        }
    }
}

/// A billable account (tenant/team).
///
/// # Invariants
/// - `is_active == false` makes the account invisible to every consumer-facing
///   operation except reactivation.
/// - `contact_email` only ever changes to an address belonging to a current
///   owner of the account.
/// - `is_robot` is set at creation and robot accounts never touch the billing
///   provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub contact_email: String,
    pub is_active: bool,
    pub is_robot: bool,
    pub billing: BillingProfile,
}

/// Input for creating an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub billing: Option<BillingDetails>,
    pub is_robot: bool,
}

/// Partial update applied by the store. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub billing: Option<BillingProfile>,
    pub is_active: Option<bool>,
}

impl AccountPatch {
    pub fn apply(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(contact_email) = self.contact_email {
            account.contact_email = contact_email;
        }
        if let Some(billing) = self.billing {
            account.billing = billing;
        }
        if let Some(is_active) = self.is_active {
            account.is_active = is_active;
        }
    }
}
