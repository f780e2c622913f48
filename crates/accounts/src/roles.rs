use serde::{Deserialize, Serialize};

use teamspace_core::{AccountId, UserId};

/// Membership role on an account.
///
/// Roles are open strings (the policy source decides what exists) except for
/// the distinguished `owner` value, which this core treats specially: only
/// owners may become the account contact. Validation against the configured
/// allow-list happens at the authorization boundary, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub const OWNER: &'static str = "owner";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn owner() -> Self {
        Self(Self::OWNER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_owner(&self) -> bool {
        self.0 == Self::OWNER
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A user's role on an account, as tracked by the access-control service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub account_id: AccountId,
    pub role: Role,
}

/// Closed set of permission actions on the account resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
    Get,
    Update,
    UpdateMember,
    RemoveMember,
    RemoveMemberSelf,
    InviteMember,
    Delete,
}

impl AccountAction {
    /// Permission-string form (`module.action` convention).
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountAction::Get => "accounts.get",
            AccountAction::Update => "accounts.update",
            AccountAction::UpdateMember => "accounts.update_member",
            AccountAction::RemoveMember => "accounts.remove_member",
            AccountAction::RemoveMemberSelf => "accounts.remove_member_self",
            AccountAction::InviteMember => "accounts.invite_member",
            AccountAction::Delete => "accounts.delete",
        }
    }
}

impl core::fmt::Display for AccountAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
