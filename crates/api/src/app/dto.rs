//! Request DTOs and JSON mapping helpers.

use serde::Deserialize;
use serde_json::{json, Value};

use teamspace_accounts::{Account, BillingDetails, MembershipView, NewAccount, Role, SetupIntent};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetailsRequest {
    pub stripe_payment_method: Option<String>,
    pub stripe_setup_intent_id: Option<String>,
    pub cardholder_name: Option<String>,
    pub address: Option<String>,
}

impl BillingDetailsRequest {
    pub fn into_domain(self) -> BillingDetails {
        BillingDetails {
            stripe_payment_method: self.stripe_payment_method,
            stripe_setup_intent_id: self.stripe_setup_intent_id,
            cardholder_name: self.cardholder_name,
            address: self.address,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    pub billing: Option<BillingDetailsRequest>,
    #[serde(default)]
    pub is_robot: bool,
}

impl CreateAccountRequest {
    pub fn into_domain(self) -> NewAccount {
        NewAccount {
            name: self.name,
            billing: self.billing.map(BillingDetailsRequest::into_domain),
            is_robot: self.is_robot,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub name: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillingRequest {
    pub billing: BillingDetailsRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembersQuery {
    #[serde(default)]
    pub skip_account_data: bool,
}

pub fn role_from_request(role: String) -> Role {
    Role::new(role)
}

pub fn account_to_json(account: &Account) -> Value {
    json!({
        "id": account.id.to_string(),
        "name": account.name,
        "contactEmail": account.contact_email,
        "isActive": account.is_active,
        "isRobot": account.is_robot,
        "billing": {
            "stripeCustomerId": account.billing.stripe_customer_id.as_str(),
            "stripeSetupIntentId": account.billing.stripe_setup_intent_id,
            "cardholderName": account.billing.cardholder_name,
            "address": account.billing.address,
        },
    })
}

pub fn membership_to_json(view: &MembershipView) -> Value {
    let mut value = json!({
        "userId": view.membership.user_id.to_string(),
        "accountId": view.membership.account_id.to_string(),
        "role": view.membership.role.as_str(),
    });
    if let Some(account) = &view.account {
        value["account"] = account_to_json(account);
    }
    value
}

pub fn setup_intent_to_json(intent: &SetupIntent) -> Value {
    json!({
        "id": intent.id,
        "clientSecret": intent.client_secret,
    })
}
