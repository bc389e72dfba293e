//! API integration tests
//!
//! Run against a live server started with a bootstrap administrator:
//! `LABCLEAR_AUTH__BOOTSTRAP_ADMIN_EMAIL` / `LABCLEAR_AUTH__BOOTSTRAP_ADMIN_PASSWORD`
//! (defaults below).

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn admin_credentials() -> (String, String) {
    (
        std::env::var("LABCLEAR_AUTH__BOOTSTRAP_ADMIN_EMAIL").unwrap_or_else(|_| "admin@labclear.test".into()),
        std::env::var("LABCLEAR_AUTH__BOOTSTRAP_ADMIN_PASSWORD").unwrap_or_else(|_| "admin-password".into()),
    )
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn admin_token(client: &Client) -> String {
    let (email, password) = admin_credentials();
    login(client, &email, &password).await
}

/// Create a profile with `role` and return (id, token)
async fn create_profile(client: &Client, admin: &str, role: &str, lab_id: Option<&str>) -> (String, String) {
    let email = format!("{}-{}@labclear.test", role, Uuid::new_v4().simple());
    let password = "correct-horse-battery";

    let response = client
        .post(format!("{}/profiles", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "email": email,
            "full_name": format!("Test {}", role),
            "password": password,
            "role": role,
            "lab_id": lab_id,
        }))
        .send()
        .await
        .expect("Failed to create profile");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse profile");
    let id = body["id"].as_str().expect("No profile id").to_string();
    let token = login(client, &email, password).await;
    (id, token)
}

async fn create_lab(client: &Client, admin: &str) -> String {
    let code = format!("LAB-{}", &Uuid::new_v4().simple().to_string()[..8]);
    let response = client
        .post(format!("{}/labs", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({ "code": code, "name": format!("Lab {}", code) }))
        .send()
        .await
        .expect("Failed to create lab");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse lab");
    body["id"].as_str().expect("No lab id").to_string()
}

async fn create_item(client: &Client, admin: &str, lab_id: &str, name: &str) -> String {
    let response = client
        .post(format!("{}/inventory", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({ "lab_id": lab_id, "name": name, "category": "electronics" }))
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse item");
    body["id"].as_str().expect("No item id").to_string()
}

async fn item_status(client: &Client, token: &str, item_id: &str) -> String {
    let body: Value = client
        .get(format!("{}/inventory/{}", BASE_URL, item_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get item")
        .json()
        .await
        .expect("Failed to parse item");
    body["status"].as_str().unwrap_or_default().to_string()
}

async fn submit(client: &Client, student: &str, lab_id: &str, items: &[&str]) -> String {
    let response = client
        .post(format!("{}/borrow-requests", BASE_URL))
        .bearer_auth(student)
        .json(&json!({
            "lab_id": lab_id,
            "purpose": "Final year project",
            "start_time": "2030-01-10T09:00:00Z",
            "end_time": "2030-01-12T17:00:00Z",
            "item_ids": items,
        }))
        .send()
        .await
        .expect("Failed to submit request");
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse request");
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["current_stage"], 1);
    body["id"].as_str().expect("No request id").to_string()
}

async fn act(client: &Client, token: &str, request_id: &str, action: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/borrow-requests/{}/{}", BASE_URL, request_id, action))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .expect("Failed to send workflow action")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
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
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();
    let (email, _) = admin_credentials();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/borrow-requests", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_full_approval_handover_and_return() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let lab_id = create_lab(&client, &admin).await;
    let item_a = create_item(&client, &admin, &lab_id, "Oscilloscope").await;
    let item_b = create_item(&client, &admin, &lab_id, "Signal generator").await;

    let (student_id, student) = create_profile(&client, &admin, "student", None).await;
    let (_, assistant) = create_profile(&client, &admin, "lab_assistant", Some(&lab_id)).await;
    let (_, oic) = create_profile(&client, &admin, "oic_cen_labs", None).await;
    let (_, asst) = create_profile(&client, &admin, "asst_oic_cen_labs", None).await;
    let (_, hod) = create_profile(&client, &admin, "hod", None).await;

    let request_id = submit(&client, &student, &lab_id, &[&item_a, &item_b]).await;

    // The department head cannot jump the queue
    let response = act(&client, &hod, &request_id, "approve", json!({})).await;
    assert_eq!(response.status(), 403);

    let response = act(&client, &assistant, &request_id, "approve", json!({ "notes": "ok" })).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "stage1_approved");
    assert_eq!(body["current_stage"], 2);

    let response = act(&client, &oic, &request_id, "approve", json!({})).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "stage2_pending");
    assert_eq!(body["current_stage"], 2);

    // Same oversight signature twice
    let response = act(&client, &oic, &request_id, "approve", json!({})).await;
    assert_eq!(response.status(), 409);

    let response = act(&client, &asst, &request_id, "approve", json!({})).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "stage2_approved");
    assert_eq!(body["current_stage"], 3);

    let response = act(&client, &hod, &request_id, "approve", json!({})).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["current_stage"], 4);

    let response = act(&client, &assistant, &request_id, "handover", json!({})).await;
    assert_eq!(response.status(), 200);
    assert_eq!(item_status(&client, &admin, &item_a).await, "borrowed");
    assert_eq!(item_status(&client, &admin, &item_b).await, "borrowed");

    let response = act(&client, &assistant, &request_id, "handover", json!({})).await;
    assert_eq!(response.status(), 409);

    // Outstanding equipment blocks clearance
    let report: Value = client
        .get(format!("{}/clearance/{}", BASE_URL, student_id))
        .bearer_auth(&student)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["eligible"], false);

    let response = act(&client, &assistant, &request_id, "return", json!({})).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "returned");
    assert_eq!(item_status(&client, &admin, &item_a).await, "available");
    assert_eq!(item_status(&client, &admin, &item_b).await, "available");

    let response = client
        .post(format!("{}/clearance/{}/certificate", BASE_URL, student_id))
        .bearer_auth(&hod)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let certificate: Value = response.json().await.unwrap();
    let code = certificate["verification_code"].as_str().unwrap();

    let response = client
        .get(format!("{}/certificates/{}", BASE_URL, code.to_lowercase()))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
#[ignore]
async fn test_rejection_at_oversight_stage() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let lab_id = create_lab(&client, &admin).await;
    let item = create_item(&client, &admin, &lab_id, "Multimeter").await;

    let (_, student) = create_profile(&client, &admin, "student", None).await;
    let (_, engineer) = create_profile(&client, &admin, "lab_engineer", Some(&lab_id)).await;
    let (_, asst) = create_profile(&client, &admin, "asst_oic_cen_labs", None).await;
    let (_, hod) = create_profile(&client, &admin, "hod", None).await;

    let request_id = submit(&client, &student, &lab_id, &[&item]).await;
    act(&client, &engineer, &request_id, "approve", json!({})).await;

    let response = act(&client, &asst, &request_id, "reject", json!({ "reason": "   " })).await;
    assert_eq!(response.status(), 400);

    let reason = "Equipment reserved for exams";
    let response = act(&client, &asst, &request_id, "reject", json!({ "reason": reason })).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["rejection_stage"], 2);
    assert_eq!(body["current_stage"], 2);
    assert_eq!(body["rejection_reason"], reason);

    let response = act(&client, &hod, &request_id, "approve", json!({})).await;
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_students_cannot_approve_or_read_others() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let lab_id = create_lab(&client, &admin).await;
    let item = create_item(&client, &admin, &lab_id, "Soldering station").await;
    let (_, student) = create_profile(&client, &admin, "student", None).await;
    let (_, other) = create_profile(&client, &admin, "student", None).await;

    let request_id = submit(&client, &student, &lab_id, &[&item]).await;

    let response = act(&client, &student, &request_id, "approve", json!({})).await;
    assert_eq!(response.status(), 403);

    let response = client
        .get(format!("{}/borrow-requests/{}", BASE_URL, request_id))
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    // Time window must run forwards
    let response = client
        .post(format!("{}/borrow-requests", BASE_URL))
        .bearer_auth(&student)
        .json(&json!({
            "lab_id": lab_id,
            "purpose": "Backwards window",
            "start_time": "2030-01-12T09:00:00Z",
            "end_time": "2030-01-10T09:00:00Z",
            "item_ids": [item],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_procurement_transitions() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let lab_id = create_lab(&client, &admin).await;

    let response = client
        .post(format!("{}/procurement", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "lab_id": lab_id,
            "item_name": "Logic analyser",
            "quantity": 2,
            "estimated_cost": "1250.00",
            "justification": "Digital electronics course",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();

    let response = client
        .put(format!("{}/procurement/{}/status", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "ordered" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    let response = client
        .put(format!("{}/procurement/{}/status", BASE_URL, id))
        .bearer_auth(&admin)
        .json(&json!({ "status": "approved", "notes": "Within budget" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "approved");
    assert!(body["decided_by"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_maintenance_takes_item_out_of_circulation() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let lab_id = create_lab(&client, &admin).await;
    let item = create_item(&client, &admin, &lab_id, "Power supply").await;

    let response = client
        .post(format!("{}/maintenance", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({ "item_id": item, "description": "Fan noise" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let record: Value = response.json().await.unwrap();
    assert_eq!(item_status(&client, &admin, &item).await, "maintenance");

    let response = client
        .post(format!("{}/maintenance/{}/resolve", BASE_URL, record["id"].as_str().unwrap()))
        .bearer_auth(&admin)
        .json(&json!({ "resolution": "Fan replaced" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(item_status(&client, &admin, &item).await, "available");
}
