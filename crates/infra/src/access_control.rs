use std::sync::RwLock;

use async_trait::async_trait;

use teamspace_accounts::{AccessControl, AccessError, AccountAction, Membership, Role};
use teamspace_core::{AccountId, RequestContext, UserId};

/// Roles the in-memory policy knows about. Open-ended role strings are
/// validated against this allow-list at this boundary, not in the domain.
const KNOWN_ROLES: &[&str] = &["owner", "admin", "member"];

/// Role → action policy.
///
/// Intentionally simple until a real policy source exists: owners can do
/// everything, admins everything except delete, members can read and leave.
fn role_grants(role: &Role, action: AccountAction) -> bool {
    match role.as_str() {
        "owner" => true,
        "admin" => !matches!(action, AccountAction::Delete),
        "member" => matches!(
            action,
            AccountAction::Get | AccountAction::RemoveMemberSelf
        ),
        _ => false,
    }
}

/// In-memory membership tracking and permission decisions for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryAccessControl {
    memberships: RwLock<Vec<Membership>>,
}

impl InMemoryAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_known_role(role: &Role) -> Result<(), AccessError> {
        if KNOWN_ROLES.contains(&role.as_str()) {
            Ok(())
        } else {
            Err(AccessError::UnknownRole(role.as_str().to_string()))
        }
    }

    fn lock(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, Vec<Membership>>, AccessError> {
        self.memberships
            .write()
            .map_err(|_| AccessError::Backend("membership lock poisoned".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<Membership>, AccessError> {
        self.memberships
            .read()
            .map(|m| m.clone())
            .map_err(|_| AccessError::Backend("membership lock poisoned".to_string()))
    }
}

#[async_trait]
impl AccessControl for InMemoryAccessControl {
    async fn my_memberships(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<Membership>, AccessError> {
        let user = ctx.session().user_id();
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|m| m.user_id == user)
            .collect())
    }

    async fn can_i(
        &self,
        ctx: &RequestContext,
        account_ids: &[AccountId],
        action: AccountAction,
    ) -> Result<bool, AccessError> {
        let user = ctx.session().user_id();
        let memberships = self.snapshot()?;
        Ok(account_ids.iter().all(|account_id| {
            memberships.iter().any(|m| {
                m.user_id == user && m.account_id == *account_id && role_grants(&m.role, action)
            })
        }))
    }

    async fn resource_memberships(
        &self,
        _ctx: &RequestContext,
        account_id: AccountId,
    ) -> Result<Vec<Membership>, AccessError> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|m| m.account_id == account_id)
            .collect())
    }

    async fn add_membership(
        &self,
        _ctx: &RequestContext,
        user_id: UserId,
        account_id: AccountId,
        role: Role,
    ) -> Result<(), AccessError> {
        Self::ensure_known_role(&role)?;
        let mut memberships = self.lock()?;
        // Re-inviting an existing member replaces their role instead of
        // accumulating duplicate rows.
        if let Some(existing) = memberships
            .iter_mut()
            .find(|m| m.user_id == user_id && m.account_id == account_id)
        {
            existing.role = role;
            return Ok(());
        }
        memberships.push(Membership {
            user_id,
            account_id,
            role,
        });
        Ok(())
    }

    async fn set_membership_role(
        &self,
        _ctx: &RequestContext,
        account_id: AccountId,
        user_id: UserId,
        role: Role,
    ) -> Result<(), AccessError> {
        Self::ensure_known_role(&role)?;
        let mut memberships = self.lock()?;
        let existing = memberships
            .iter_mut()
            .find(|m| m.user_id == user_id && m.account_id == account_id)
            .ok_or(AccessError::NotFound)?;
        existing.role = role;
        Ok(())
    }

    async fn remove_membership(
        &self,
        _ctx: &RequestContext,
        account_id: AccountId,
        user_id: UserId,
    ) -> Result<(), AccessError> {
        let mut memberships = self.lock()?;
        let before = memberships.len();
        memberships.retain(|m| !(m.user_id == user_id && m.account_id == account_id));
        if memberships.len() == before {
            return Err(AccessError::NotFound);
        }
        Ok(())
    }

    async fn remove_resource(
        &self,
        _ctx: &RequestContext,
        account_id: AccountId,
    ) -> Result<(), AccessError> {
        self.lock()?.retain(|m| m.account_id != account_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use teamspace_core::Session;

    use super::*;

    fn ctx(user: UserId) -> RequestContext {
        RequestContext::new(Session::new(user, "user@example.com"))
    }

    #[tokio::test]
    async fn unknown_roles_are_rejected_at_this_boundary() {
        let access = InMemoryAccessControl::new();
        let user = UserId::new();
        let err = access
            .add_membership(&ctx(user), user, AccountId::new(), Role::new("superuser"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::UnknownRole(_)));
    }

    #[tokio::test]
    async fn policy_grants_follow_the_role_ladder() {
        let access = InMemoryAccessControl::new();
        let owner = UserId::new();
        let member = UserId::new();
        let account_id = AccountId::new();

        access
            .add_membership(&ctx(owner), owner, account_id, Role::owner())
            .await
            .unwrap();
        access
            .add_membership(&ctx(owner), member, account_id, Role::new("member"))
            .await
            .unwrap();

        assert!(access
            .can_i(&ctx(owner), &[account_id], AccountAction::Delete)
            .await
            .unwrap());
        assert!(access
            .can_i(&ctx(member), &[account_id], AccountAction::Get)
            .await
            .unwrap());
        assert!(!access
            .can_i(&ctx(member), &[account_id], AccountAction::RemoveMember)
            .await
            .unwrap());
        assert!(access
            .can_i(&ctx(member), &[account_id], AccountAction::RemoveMemberSelf)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn set_membership_role_is_a_single_replace() {
        let access = InMemoryAccessControl::new();
        let user = UserId::new();
        let account_id = AccountId::new();

        access
            .add_membership(&ctx(user), user, account_id, Role::new("member"))
            .await
            .unwrap();
        access
            .set_membership_role(&ctx(user), account_id, user, Role::new("admin"))
            .await
            .unwrap();

        let memberships = access
            .resource_memberships(&ctx(user), account_id)
            .await
            .unwrap();
        assert_eq!(memberships.len(), 1);
        assert_eq!(memberships[0].role.as_str(), "admin");
    }

    #[tokio::test]
    async fn remove_resource_tears_down_every_membership() {
        let access = InMemoryAccessControl::new();
        let a = UserId::new();
        let b = UserId::new();
        let account_id = AccountId::new();

        access
            .add_membership(&ctx(a), a, account_id, Role::owner())
            .await
            .unwrap();
        access
            .add_membership(&ctx(a), b, account_id, Role::new("member"))
            .await
            .unwrap();

        access.remove_resource(&ctx(a), account_id).await.unwrap();
        assert!(access
            .resource_memberships(&ctx(a), account_id)
            .await
            .unwrap()
            .is_empty());
    }
}
