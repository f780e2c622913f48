//! Account domain: billable accounts, membership roles, billing transitions.
//!
//! The [`service::AccountService`] composes four abstract capability ports
//! (store, access control, billing provider, identity directory); adapters
//! live in `teamspace-infra`, the HTTP surface in `teamspace-api`.

pub mod account;
pub mod ports;
pub mod roles;
pub mod service;

pub use account::{
    Account, AccountPatch, BillingDetails, BillingProfile, CustomerId, NewAccount,
    DEV_CUSTOMER_ID, ROBOT_CUSTOMER_ID,
};
pub use ports::{
    AccessControl, AccessError, AccountStore, BillingError, BillingProvider, Directory,
    DirectoryError, DirectoryUser, SetupIntent, StoreError,
};
pub use roles::{AccountAction, Membership, Role};
pub use service::{
    AccountService, InviteMember, MembershipView, RemoveMember, UpdateAccount, UpdateBilling,
    UpdateMember,
};
