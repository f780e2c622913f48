use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use teamspace_accounts::{
    InviteMember, RemoveMember, UpdateAccount, UpdateBilling, UpdateMember,
};
use teamspace_core::RequestContext;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_account).get(list_accounts))
        .route(
            "/:id",
            get(get_account).patch(update_account).delete(delete_account),
        )
        .route("/:id/deactivate", post(deactivate_account))
        .route("/:id/activate", post(activate_account))
        .route("/:id/billing", put(update_billing))
        .route("/:id/members", get(list_members))
        .route("/:id/members/invite", post(invite_member))
        .route(
            "/:id/members/:user_id",
            axum::routing::patch(update_member).delete(remove_member),
        )
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::CreateAccountRequest>,
) -> axum::response::Response {
    match services.accounts.create_account(&ctx, body.into_domain()).await {
        Ok(account) => {
            (StatusCode::CREATED, Json(dto::account_to_json(&account))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_accounts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    match services.accounts.list_accounts(&ctx).await {
        Ok(accounts) => {
            let items: Vec<_> = accounts.iter().map(dto::account_to_json).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "items": items })),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.accounts.get_account(&ctx, account_id).await {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateAccountRequest>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let input = UpdateAccount {
        account_id,
        name: body.name,
        contact_email: body.contact_email,
    };
    match services.accounts.update_account(&ctx, input).await {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.accounts.delete_account(&ctx, account_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn deactivate_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.accounts.deactivate(&ctx, account_id).await {
        Ok(deactivated) => (
            StatusCode::OK,
            Json(serde_json::json!({ "isActive": !deactivated })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn activate_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services.accounts.activate(&ctx, account_id).await {
        Ok(activated) => (
            StatusCode::OK,
            Json(serde_json::json!({ "isActive": activated })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_billing(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateBillingRequest>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let input = UpdateBilling {
        account_id,
        billing: body.billing.into_domain(),
        skip_stripe: services.skip_stripe,
    };
    match services.accounts.update_billing(&ctx, input).await {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Query(query): Query<dto::MembersQuery>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match services
        .accounts
        .list_memberships(&ctx, account_id, query.skip_account_data)
        .await
    {
        Ok(views) => {
            let items: Vec<_> = views.iter().map(dto::membership_to_json).collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "items": items })),
            )
                .into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn invite_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::InviteMemberRequest>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let input = InviteMember {
        account_id,
        name: body.name,
        email: body.email,
        role: dto::role_from_request(body.role),
    };
    match services.accounts.invite_member(&ctx, input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, user_id)): Path<(String, String)>,
    Json(body): Json<dto::UpdateMemberRequest>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let user_id = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let input = UpdateMember {
        account_id,
        user_id,
        role: dto::role_from_request(body.role),
    };
    match services.accounts.update_member(&ctx, input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path((id, user_id)): Path<(String, String)>,
) -> axum::response::Response {
    let account_id = match errors::parse_account_id(&id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let user_id = match errors::parse_user_id(&user_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let input = RemoveMember {
        account_id,
        user_id,
    };
    match services.accounts.remove_member(&ctx, input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
