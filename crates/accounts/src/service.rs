//! The account domain service.
//!
//! Owns account lifecycle, membership mutations guarded by permission checks,
//! and billing-state transitions. Every external concern is reached through a
//! port injected at construction time.
//!
//! Multi-step operations issue their port calls sequentially with no
//! transactional envelope; a later step's failure is surfaced without rolling
//! back earlier side effects (notably: a billing customer created before a
//! failed account insert is left behind at the provider).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use teamspace_core::{AccountId, DomainError, DomainResult, RequestContext, UserId};

use crate::account::{
    Account, AccountPatch, BillingDetails, BillingProfile, CustomerId, DEV_CUSTOMER_ID, NewAccount,
};
use crate::ports::{AccessControl, AccountStore, BillingProvider, Directory, SetupIntent};
use crate::roles::{AccountAction, Membership, Role};

/// Input for [`AccountService::update_account`].
#[derive(Debug, Clone)]
pub struct UpdateAccount {
    pub account_id: AccountId,
    pub name: String,
    pub contact_email: String,
}

/// Input for [`AccountService::update_billing`].
#[derive(Debug, Clone)]
pub struct UpdateBilling {
    pub account_id: AccountId,
    pub billing: BillingDetails,
    /// Bypass the real billing provider and use the dev sentinel customer.
    pub skip_stripe: bool,
}

/// Input for [`AccountService::invite_member`].
#[derive(Debug, Clone)]
pub struct InviteMember {
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Input for [`AccountService::update_member`].
#[derive(Debug, Clone)]
pub struct UpdateMember {
    pub account_id: AccountId,
    pub user_id: UserId,
    pub role: Role,
}

/// Input for [`AccountService::remove_member`].
#[derive(Debug, Clone)]
pub struct RemoveMember {
    pub account_id: AccountId,
    pub user_id: UserId,
}

/// A membership row, optionally joined with its account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipView {
    #[serde(flatten)]
    pub membership: Membership,
    pub account: Option<Account>,
}

/// The account domain service.
///
/// Constructed with its four collaborators; no defaults are wired internally,
/// so tests supply fakes directly.
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    access: Arc<dyn AccessControl>,
    billing: Arc<dyn BillingProvider>,
    directory: Arc<dyn Directory>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        access: Arc<dyn AccessControl>,
        billing: Arc<dyn BillingProvider>,
        directory: Arc<dyn Directory>,
    ) -> Self {
        Self {
            store,
            access,
            billing,
            directory,
        }
    }

    /// Internal guard used by nearly every operation: a deactivated account
    /// behaves exactly like a missing one. Never exposed across the service
    /// boundary; external callers go through [`Self::get_account`].
    async fn account_unchecked(&self, account_id: AccountId) -> DomainResult<Account> {
        match self.store.get(account_id).await? {
            Some(account) if account.is_active => Ok(account),
            _ => Err(DomainError::bad_request(format!(
                "account {account_id} not found or deactivated"
            ))),
        }
    }

    async fn authorize(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
        action: AccountAction,
        denied: &str,
    ) -> DomainResult<()> {
        let allowed = self.access.can_i(ctx, &[account_id], action).await?;
        if allowed {
            Ok(())
        } else {
            Err(DomainError::unauthorized(denied))
        }
    }

    /// Accounts the caller holds memberships on, deactivated rows included.
    /// Access control alone drives the result; the active-only guard does not
    /// apply here, which is what lets an owner find a deactivated account's
    /// id again to reactivate it.
    pub async fn list_accounts(&self, ctx: &RequestContext) -> DomainResult<Vec<Account>> {
        let memberships = self.access.my_memberships(ctx).await?;
        let ids: Vec<AccountId> = memberships.iter().map(|m| m.account_id).collect();
        Ok(self.store.get_many(&ids).await?)
    }

    /// Fetch one account, permission-checked. Fails with `BadRequest` when
    /// the account is missing or deactivated even if permission was granted.
    pub async fn get_account(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
    ) -> DomainResult<Account> {
        self.authorize(ctx, account_id, AccountAction::Get, "not allowed to view this account")
            .await?;
        self.account_unchecked(account_id).await
    }

    /// Create an account. Ordered, non-transactional: billing customer first
    /// (unless robot), then the row, then the creator's owner membership.
    pub async fn create_account(
        &self,
        ctx: &RequestContext,
        input: NewAccount,
    ) -> DomainResult<Account> {
        if input.name.trim().is_empty() {
            return Err(DomainError::bad_params("name is required"));
        }
        if !input.is_robot && input.billing.is_none() {
            return Err(DomainError::bad_params(
                "billing is required for non-robot accounts",
            ));
        }

        let account_id = self.store.new_id();

        let billing = if input.is_robot {
            BillingProfile::robot()
        } else {
            let details = input.billing.unwrap_or_default();
            let customer_id = self
                .billing
                .create_customer(account_id, details.stripe_payment_method.as_deref())
                .await
                .map_err(|e| {
                    DomainError::bad_request(format!(
                        "could not create stripe customer because {e}"
                    ))
                })?;
            details.into_profile(customer_id)
        };

        let account = Account {
            id: account_id,
            name: input.name,
            contact_email: ctx.session().email().to_string(),
            is_active: true,
            is_robot: input.is_robot,
            billing,
        };

        let account = self.store.insert(account).await.map_err(|e| {
            DomainError::bad_request(format!("could not create account because {e}"))
        })?;

        self.access
            .add_membership(ctx, ctx.session().user_id(), account_id, Role::owner())
            .await?;

        tracing::info!(account_id = %account_id, robot = account.is_robot, "account created");
        Ok(account)
    }

    /// Issue a payment-collection intent. No account context required; the
    /// UI uses this to collect a payment method before account creation.
    pub async fn setup_intent(&self) -> DomainResult<SetupIntent> {
        Ok(self.billing.setup_intent().await?)
    }

    /// Memberships on an account, each optionally joined with its account
    /// record. Visibility of the list itself is delegated to the
    /// access-control service's own rules.
    pub async fn list_memberships(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
        skip_account_data: bool,
    ) -> DomainResult<Vec<MembershipView>> {
        self.account_unchecked(account_id).await?;
        let memberships = self.access.resource_memberships(ctx, account_id).await?;

        if skip_account_data {
            return Ok(memberships
                .into_iter()
                .map(|membership| MembershipView {
                    membership,
                    account: None,
                })
                .collect());
        }

        let ids: Vec<AccountId> = memberships.iter().map(|m| m.account_id).collect();
        let accounts: HashMap<AccountId, Account> = self
            .store
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(memberships
            .into_iter()
            .map(|membership| {
                let account = accounts.get(&membership.account_id).cloned();
                MembershipView {
                    membership,
                    account,
                }
            })
            .collect())
    }

    /// Update name and contact email. The new contact must resolve to a user
    /// who currently holds the `owner` role on this account.
    pub async fn update_account(
        &self,
        ctx: &RequestContext,
        input: UpdateAccount,
    ) -> DomainResult<Account> {
        self.account_unchecked(input.account_id).await?;
        self.authorize(
            ctx,
            input.account_id,
            AccountAction::Update,
            "not allowed to update this account",
        )
        .await?;

        let owners: Vec<UserId> = self
            .access
            .resource_memberships(ctx, input.account_id)
            .await?
            .into_iter()
            .filter(|m| m.role.is_owner())
            .map(|m| m.user_id)
            .collect();

        let contact = self
            .directory
            .find_by_email(ctx, &input.contact_email)
            .await?
            .ok_or_else(|| {
                DomainError::bad_request(format!("no user with email {}", input.contact_email))
            })?;

        if !owners.contains(&contact.id) {
            return Err(DomainError::bad_request(
                "contactEmail is not an owner of this account",
            ));
        }

        let account = self
            .store
            .update(
                input.account_id,
                AccountPatch {
                    name: Some(input.name),
                    contact_email: Some(input.contact_email),
                    ..Default::default()
                },
            )
            .await?;
        Ok(account)
    }

    /// Replace the account's billing profile with a freshly obtained
    /// provider customer (or the dev sentinel). The previous customer is
    /// deleted at the provider unless it was a sentinel.
    pub async fn update_billing(
        &self,
        _ctx: &RequestContext,
        input: UpdateBilling,
    ) -> DomainResult<Account> {
        let current = self.account_unchecked(input.account_id).await?;

        let customer_id = if input.skip_stripe {
            CustomerId::new(DEV_CUSTOMER_ID)
        } else {
            self.billing
                .create_customer(
                    input.account_id,
                    input.billing.stripe_payment_method.as_deref(),
                )
                .await
                .map_err(|e| {
                    DomainError::bad_request(format!(
                        "could not create stripe customer because {e}"
                    ))
                })?
        };

        if customer_id.is_empty() {
            return Err(DomainError::bad_params(
                "could not obtain a billing customer id",
            ));
        }

        // Sentinel customers only exist on our side; never ask the provider
        // to delete one.
        let previous = &current.billing.stripe_customer_id;
        if !previous.is_sentinel() {
            self.billing.delete_customer(previous).await?;
        }

        let account = self
            .store
            .update(
                input.account_id,
                AccountPatch {
                    billing: Some(input.billing.into_profile(customer_id)),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(account_id = %input.account_id, "billing updated");
        Ok(account)
    }

    /// Hide the account from every operation except [`Self::activate`].
    /// Returns whether the persisted record is now inactive.
    ///
    /// No permission check in this core; authorization for (de)activation is
    /// enforced by the caller.
    pub async fn deactivate(
        &self,
        _ctx: &RequestContext,
        account_id: AccountId,
    ) -> DomainResult<bool> {
        self.account_unchecked(account_id).await?;
        let account = self
            .store
            .update(
                account_id,
                AccountPatch {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(account_id = %account_id, "account deactivated");
        Ok(!account.is_active)
    }

    /// Reactivate a deactivated account. Deliberately skips the active-only
    /// guard: the target account is expected to be inactive. Returns whether
    /// the persisted record is now active.
    pub async fn activate(
        &self,
        _ctx: &RequestContext,
        account_id: AccountId,
    ) -> DomainResult<bool> {
        let account = self
            .store
            .update(
                account_id,
                AccountPatch {
                    is_active: Some(true),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(account_id = %account_id, "account activated");
        Ok(account.is_active)
    }

    /// Invite a user by email and grant them a role. Duplicate-invite
    /// semantics are delegated entirely to the access-control service.
    pub async fn invite_member(
        &self,
        ctx: &RequestContext,
        input: InviteMember,
    ) -> DomainResult<()> {
        if input.name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.role.as_str().trim().is_empty()
        {
            return Err(DomainError::bad_params(
                "name, email and role are required to invite a member",
            ));
        }

        self.account_unchecked(input.account_id).await?;
        self.authorize(
            ctx,
            input.account_id,
            AccountAction::InviteMember,
            "not allowed to invite members to this account",
        )
        .await?;

        let invited = self
            .directory
            .invite_signup(ctx, &input.email, &input.name)
            .await?;
        self.access
            .add_membership(ctx, invited, input.account_id, input.role)
            .await?;

        tracing::info!(account_id = %input.account_id, invited = %invited, "member invited");
        Ok(())
    }

    /// Change a member's role. The account contact's role can never be
    /// changed through this path.
    pub async fn update_member(
        &self,
        ctx: &RequestContext,
        input: UpdateMember,
    ) -> DomainResult<()> {
        let account = self.account_unchecked(input.account_id).await?;
        self.authorize(
            ctx,
            input.account_id,
            AccountAction::UpdateMember,
            "not allowed to update members of this account",
        )
        .await?;

        self.ensure_not_contact(ctx, &account, input.user_id, || {
            DomainError::bad_params("cannot change the role of the account contact")
        })
        .await?;

        self.access
            .set_membership_role(ctx, input.account_id, input.user_id, input.role)
            .await?;
        Ok(())
    }

    /// Remove a member. Self-removal is a distinct permission action from
    /// removing someone else. The account contact can never be removed.
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        input: RemoveMember,
    ) -> DomainResult<()> {
        let account = self.account_unchecked(input.account_id).await?;

        let action = if input.user_id == ctx.session().user_id() {
            AccountAction::RemoveMemberSelf
        } else {
            AccountAction::RemoveMember
        };
        self.authorize(
            ctx,
            input.account_id,
            action,
            "not allowed to remove this member",
        )
        .await?;

        self.ensure_not_contact(ctx, &account, input.user_id, || {
            DomainError::unauthorized("cannot remove the account contact")
        })
        .await?;

        self.access
            .remove_membership(ctx, input.account_id, input.user_id)
            .await?;
        Ok(())
    }

    /// Delete an account: bulk membership teardown, then the row itself.
    /// Works on deactivated accounts too (no active-only guard).
    ///
    /// The billing customer is not released here; see `update_billing` for
    /// the only path that deletes provider customers.
    pub async fn delete_account(
        &self,
        ctx: &RequestContext,
        account_id: AccountId,
    ) -> DomainResult<()> {
        self.authorize(
            ctx,
            account_id,
            AccountAction::Delete,
            "not allowed to delete this account",
        )
        .await?;

        self.access.remove_resource(ctx, account_id).await?;
        self.store.remove(account_id).await?;

        tracing::info!(account_id = %account_id, "account deleted");
        Ok(())
    }

    /// Guard protecting the account's primary contact from membership
    /// mutations. A contact email that no longer resolves in the directory
    /// protects nobody.
    async fn ensure_not_contact(
        &self,
        ctx: &RequestContext,
        account: &Account,
        target: UserId,
        err: impl FnOnce() -> DomainError,
    ) -> DomainResult<()> {
        let contact = self
            .directory
            .find_by_email(ctx, &account.contact_email)
            .await?;
        match contact {
            Some(user) if user.id == target => Err(err()),
            _ => Ok(()),
        }
    }
}
