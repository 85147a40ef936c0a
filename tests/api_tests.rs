//! API integration tests
//!
//! These run against a live server with a seeded admin account.
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success(), "login failed for {}", username);
    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin", "admin").await
}

fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    format!("{}{}", prefix, nanos)
}

/// Create a user via the admin API and return (id, username)
async fn create_user(client: &Client, admin: &str, role: &str) -> (i64, String) {
    let username = unique("u");
    let response = client
        .post(format!("{}/users", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "username": username,
            "email": format!("{}@example.org", username),
            "full_name": "Test User",
            "password": "password123",
            "role": role
        }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    (body["id"].as_i64().unwrap(), username)
}

async fn create_record(client: &Client, admin: &str) -> i64 {
    let response = client
        .post(format!("{}/records", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "title": unique("Pension file "),
            "category": "pension",
            "metadata": { "office": "central" }
        }))
        .send()
        .await
        .expect("Failed to create record");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

/// Scenario A: pool borrow with handover and receipt confirmation
#[tokio::test]
#[ignore]
async fn test_pool_borrow_handover_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, username) = create_user(&client, &admin, "user").await;
    let user = login(&client, &username, "password123").await;
    let record_id = create_record(&client, &admin).await;

    // User requests to borrow an available record
    let response = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let request: Value = response.json().await.unwrap();
    assert_eq!(request["status"], "pending");
    assert_eq!(request["request_type"], "borrow");
    assert!(request["target_user"].is_null());
    let request_id = request["id"].as_i64().unwrap();

    // Manager hands the record over; stored status becomes awaiting_confirmation
    let response = client
        .put(format!("{}/requests/{}", BASE_URL, request_id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "handed_over" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["status"], "awaiting_confirmation");

    // Record is untouched until the borrower confirms receipt
    let record: Value = client
        .get(format!("{}/records/{}", BASE_URL, record_id))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["status"], "available");
    assert!(record["current_holder"].is_null());

    // Borrower confirms receipt; possession transfers
    let response = client
        .put(format!("{}/requests/{}/confirm-receipt", BASE_URL, request_id))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let confirmed: Value = response.json().await.unwrap();
    assert_eq!(confirmed["status"], "approved");

    let record: Value = client
        .get(format!("{}/records/{}", BASE_URL, record_id))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["status"], "borrowed");
    assert!(record["borrowed_date"].is_string());
}

/// Scenario B + D: peer borrow, wrong-user rejection, holder approval
#[tokio::test]
#[ignore]
async fn test_peer_borrow_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (holder_id, holder_name) = create_user(&client, &admin, "user").await;
    let (_, borrower_name) = create_user(&client, &admin, "user").await;
    let (_, outsider_name) = create_user(&client, &admin, "user").await;
    let holder = login(&client, &holder_name, "password123").await;
    let borrower = login(&client, &borrower_name, "password123").await;
    let outsider = login(&client, &outsider_name, "password123").await;
    let record_id = create_record(&client, &admin).await;

    // Put the record in the holder's hands via the pool flow
    let req: Value = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&holder)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    client
        .put(format!("{}/requests/{}", BASE_URL, req["id"]))
        .bearer_auth(&admin)
        .json(&json!({ "status": "handed_over" }))
        .send()
        .await
        .unwrap();
    client
        .put(format!("{}/requests/{}/confirm-receipt", BASE_URL, req["id"]))
        .bearer_auth(&holder)
        .send()
        .await
        .unwrap();

    // Borrower requests the held record; routed to the holder
    let response = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&borrower)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let peer_req: Value = response.json().await.unwrap();
    assert_eq!(peer_req["request_type"], "borrow_from_user");
    assert_eq!(peer_req["target_user"].as_i64().unwrap(), holder_id);
    let peer_id = peer_req["id"].as_i64().unwrap();

    // Someone else cannot decide the request
    let response = client
        .put(format!("{}/requests/{}/approve", BASE_URL, peer_id))
        .bearer_auth(&outsider)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // The holder approves; possession transfers immediately
    let response = client
        .put(format!("{}/requests/{}/approve", BASE_URL, peer_id))
        .bearer_auth(&holder)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let approved: Value = response.json().await.unwrap();
    assert_eq!(approved["status"], "approved");

    let record: Value = client
        .get(format!("{}/records/{}", BASE_URL, record_id))
        .bearer_auth(&borrower)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["status"], "borrowed");
    assert_eq!(
        record["current_holder"].as_i64(),
        peer_req["user_id"].as_i64()
    );
}

/// Scenario C: return request confirmed by management
#[tokio::test]
#[ignore]
async fn test_return_flow() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, username) = create_user(&client, &admin, "user").await;
    let user = login(&client, &username, "password123").await;
    let record_id = create_record(&client, &admin).await;

    // Borrow via pool flow
    let req: Value = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    client
        .put(format!("{}/requests/{}", BASE_URL, req["id"]))
        .bearer_auth(&admin)
        .json(&json!({ "status": "handed_over" }))
        .send()
        .await
        .unwrap();
    client
        .put(format!("{}/requests/{}/confirm-receipt", BASE_URL, req["id"]))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap();

    // Holder files a return request
    let response = client
        .post(format!("{}/requests/return", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let ret: Value = response.json().await.unwrap();
    assert_eq!(ret["request_type"], "return");
    assert!(ret["target_user"].is_null());

    // Manager confirms the return
    let response = client
        .put(format!("{}/requests/{}/confirm-return", BASE_URL, ret["id"]))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let confirmed: Value = response.json().await.unwrap();
    assert_eq!(confirmed["status"], "approved");

    let record: Value = client
        .get(format!("{}/records/{}", BASE_URL, record_id))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(record["status"], "available");
    assert!(record["current_holder"].is_null());
    assert!(record["return_date"].is_string());
}

/// Scenario E: duplicate pending request is a conflict
#[tokio::test]
#[ignore]
async fn test_duplicate_pending_request() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, username) = create_user(&client, &admin, "user").await;
    let user = login(&client, &username, "password123").await;
    let record_id = create_record(&client, &admin).await;

    let response = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

/// Rejected requests cannot be transitioned again
#[tokio::test]
#[ignore]
async fn test_rejected_is_terminal() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, username) = create_user(&client, &admin, "user").await;
    let user = login(&client, &username, "password123").await;
    let record_id = create_record(&client, &admin).await;

    let req: Value = client
        .post(format!("{}/requests/borrow", BASE_URL))
        .bearer_auth(&user)
        .json(&json!({ "record_id": record_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .put(format!("{}/requests/{}", BASE_URL, req["id"]))
        .bearer_auth(&admin)
        .json(&json!({ "status": "rejected", "admin_response": "File is archived" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client
        .put(format!("{}/requests/{}", BASE_URL, req["id"]))
        .bearer_auth(&admin)
        .json(&json!({ "status": "searching" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_shapes() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let (_, username) = create_user(&client, &admin, "user").await;
    let user = login(&client, &username, "password123").await;

    let body: Value = client
        .get(format!("{}/dashboard", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["total_users"].is_number());
    assert!(body["pending_requests"].is_number());

    let body: Value = client
        .get(format!("{}/dashboard", BASE_URL))
        .bearer_auth(&user)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["my_pending_requests"].is_number());
    assert!(body["records_held"].is_number());
}
