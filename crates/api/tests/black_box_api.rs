use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use teamspace_api::auth::ApiClaims;
use teamspace_core::UserId;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = teamspace_api::app::build_app(jwt_secret.to_string());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, email: &str) -> String {
    let now = Utc::now();
    let claims = ApiClaims {
        sub: UserId::new(),
        email: email.to_string(),
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn create_robot_account(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
) -> serde_json::Value {
    let res = client
        .post(format!("{}/accounts", base_url))
        .bearer_auth(token)
        .json(&json!({ "name": name, "isRobot": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn auth_required_for_protected_endpoints() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/accounts", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_account_ids_are_rejected() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "u1@example.com");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/accounts/not-a-uuid", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"].as_str().unwrap(), "invalid_id");
}

#[tokio::test]
async fn robot_account_lifecycle() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "ops@example.com");
    let client = reqwest::Client::new();

    let created = create_robot_account(&client, &srv.base_url, &token, "Night Batch").await;
    assert_eq!(created["isRobot"], json!(true));
    assert_eq!(created["contactEmail"].as_str().unwrap(), "ops@example.com");
    assert_eq!(
        created["billing"]["stripeCustomerId"].as_str().unwrap(),
        "robot"
    );
    let id = created["id"].as_str().unwrap().to_string();

    // Visible in the caller's list.
    let res = client
        .get(format!("{}/accounts", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    // Deactivation hides it.
    let res = client
        .post(format!("{}/accounts/{}/deactivate", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["isActive"], json!(false));

    let res = client
        .get(format!("{}/accounts/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Activation restores it.
    let res = client
        .post(format!("{}/accounts/{}/activate", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/accounts/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Deletion tears down memberships, so a subsequent read is forbidden.
    let res = client
        .delete(format!("{}/accounts/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/accounts/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_invite_update_remove() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "owner@example.com");
    let client = reqwest::Client::new();

    let created = create_robot_account(&client, &srv.base_url, &token, "Team").await;
    let id = created["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/accounts/{}/members/invite", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({
            "name": "New Member",
            "email": "member@example.com",
            "role": "member",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!(
            "{}/accounts/{}/members?skipAccountData=true",
            srv.base_url, id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap().clone();
    assert_eq!(items.len(), 2);
    let member = items
        .iter()
        .find(|m| m["role"].as_str().unwrap() == "member")
        .expect("invited member missing from the list");
    let member_id = member["userId"].as_str().unwrap().to_string();
    assert!(member["account"].is_null());

    let res = client
        .patch(format!(
            "{}/accounts/{}/members/{}",
            srv.base_url, id, member_id
        ))
        .bearer_auth(&token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(format!(
            "{}/accounts/{}/members/{}",
            srv.base_url, id, member_id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!(
            "{}/accounts/{}/members?skipAccountData=true",
            srv.base_url, id
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn billing_update_rotates_the_provider_customer() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "u1@example.com");
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/accounts", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Acme",
            "billing": { "stripePaymentMethod": "pm_1" },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    let first_customer = created["billing"]["stripeCustomerId"]
        .as_str()
        .unwrap()
        .to_string();

    let res = client
        .put(format!("{}/accounts/{}/billing", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({
            "billing": {
                "stripePaymentMethod": "pm_2",
                "cardholderName": "Jo Smith",
            },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();

    let second_customer = updated["billing"]["stripeCustomerId"].as_str().unwrap();
    assert_ne!(second_customer, first_customer);
    assert_eq!(
        updated["billing"]["cardholderName"].as_str().unwrap(),
        "Jo Smith"
    );
}

#[tokio::test]
async fn setup_intent_issues_a_client_secret() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, "u1@example.com");

    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/billing/setup-intent", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(!body["clientSecret"].as_str().unwrap().is_empty());
}
