use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        stockbook_observability::init();

        // Same router as prod, over an in-memory database, on an ephemeral port.
        let store = stockbook_store::Store::open_in_memory().await.unwrap();
        let app = stockbook_api::app::build_app(store);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn post_json(client: &reqwest::Client, url: String, body: Value) -> reqwest::Response {
    client.post(url).json(&body).send().await.unwrap()
}

async fn put_json(client: &reqwest::Client, url: String, body: Value) -> reqwest::Response {
    client.put(url).json(&body).send().await.unwrap()
}

async fn seed_user(client: &reqwest::Client, srv: &TestServer, body: Value) {
    let res = post_json(client, srv.url("/users"), body).await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

/// Users covering every role/flag combination the workflow distinguishes.
async fn seed_staff_and_managers(client: &reqwest::Client, srv: &TestServer) {
    seed_user(
        client,
        srv,
        json!({"email": "alice@x.com", "display_name": "Alice", "role": "staff", "credential": "alice-pw"}),
    )
    .await;
    seed_user(
        client,
        srv,
        json!({"email": "bob@x.com", "display_name": "Bob", "role": "manager", "credential": "bob-pw"}),
    )
    .await;
    seed_user(
        client,
        srv,
        json!({"email": "carol@x.com", "display_name": "Carol", "role": "staff", "credential": "carol-pw", "can_receive_orders": true}),
    )
    .await;
    seed_user(
        client,
        srv,
        json!({"email": "dana@x.com", "display_name": "Dana", "role": "administrator", "credential": "dana-pw"}),
    )
    .await;
}

async fn create_product(client: &reqwest::Client, srv: &TestServer, name: &str) -> String {
    let res = post_json(
        client,
        srv.url("/products"),
        json!({"name": name, "unit": "piece", "min_stock": 2, "barcode": ""}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert!(body["barcode"].is_null());
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_responds() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_staff_and_managers(&client, &srv).await;

    // Casing of the email does not matter; the credential does.
    let res = post_json(
        &client,
        srv.url("/login"),
        json!({"email": "Alice@X.com", "credential": "alice-pw"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], "alice@x.com");
    assert!(body.get("credential_hash").is_none());
    assert!(body.get("credential").is_none());

    let res = post_json(
        &client,
        srv.url("/login"),
        json!({"email": "alice@x.com", "credential": "wrong"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Unknown user looks exactly like a wrong credential.
    let res = post_json(
        &client,
        srv.url("/login"),
        json!({"email": "ghost@x.com", "credential": "alice-pw"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn movements_drive_derived_stock() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_staff_and_managers(&client, &srv).await;
    let product_id = create_product(&client, &srv, "Widget").await;

    let res = post_json(
        &client,
        srv.url("/movements"),
        json!({"product_id": product_id, "type": "inflow", "quantity": 10, "acting_user_email": "alice@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["stock"], 10);

    let res = post_json(
        &client,
        srv.url("/movements"),
        json!({"product_id": product_id, "type": "outflow", "quantity": 3, "acting_user_email": "alice@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["stock"], 7);

    let res = client
        .get(srv.url(&format!("/products/{product_id}/stock")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["stock"], 7);

    // Zero quantity is rejected before anything is written.
    let res = post_json(
        &client,
        srv.url("/movements"),
        json!({"product_id": product_id, "type": "inflow", "quantity": 0, "acting_user_email": "alice@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");

    // Unknown product is 404, not a silent zero-stock ledger.
    let ghost = uuid::Uuid::now_v7();
    let res = post_json(
        &client,
        srv.url("/movements"),
        json!({"product_id": ghost, "type": "inflow", "quantity": 1, "acting_user_email": "alice@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchase_request_full_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_staff_and_managers(&client, &srv).await;
    let product_id = create_product(&client, &srv, "Widget").await;

    let res = post_json(
        &client,
        srv.url("/purchase-requests"),
        json!({
            "requester_email": "alice@x.com",
            "items": [{"product_id": product_id, "quantity": 5, "unit": "piece"}],
            "notes": "restock"
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["requester"], "alice@x.com");
    assert_eq!(body["items"][0]["quantity"], 5);
    let id = body["id"].as_str().unwrap().to_string();
    let url = srv.url(&format!("/purchase-requests/{id}"));

    // Staff cannot approve.
    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "approved", "caller_email": "alice@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Manager approves; approver and timestamp are recorded.
    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "approved", "caller_email": "bob@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["approver"], "bob@x.com");
    assert!(!body["approved_at"].is_null());

    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "sent", "caller_email": "bob@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Receiving is gated by the flag, not the role: the manager cannot,
    // the flagged staff user can.
    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "received", "caller_email": "bob@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "received", "caller_email": "carol@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["receiver"], "carol@x.com");
    assert!(!body["received_at"].is_null());

    // Archival is administrator-only.
    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "archived", "caller_email": "bob@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "archived", "caller_email": "dana@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // Nothing leaves Archived, not even for the administrator.
    let res = put_json(
        &client,
        url.clone(),
        json!({"status": "approved", "caller_email": "dana@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_transition");
}

#[tokio::test]
async fn request_creation_is_validated() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_staff_and_managers(&client, &srv).await;
    let product_id = create_product(&client, &srv, "Widget").await;

    // No items.
    let res = post_json(
        &client,
        srv.url("/purchase-requests"),
        json!({"requester_email": "alice@x.com", "items": [], "notes": ""}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown requester.
    let res = post_json(
        &client,
        srv.url("/purchase-requests"),
        json!({
            "requester_email": "ghost@x.com",
            "items": [{"product_id": product_id, "quantity": 1, "unit": "piece"}],
            "notes": ""
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Unknown product in one item fails the whole request.
    let ghost = uuid::Uuid::now_v7();
    let res = post_json(
        &client,
        srv.url("/purchase-requests"),
        json!({
            "requester_email": "alice@x.com",
            "items": [
                {"product_id": product_id, "quantity": 1, "unit": "piece"},
                {"product_id": ghost, "quantity": 1, "unit": "piece"}
            ],
            "notes": ""
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // And none of the failed attempts left a request behind.
    let res = client.get(srv.url("/initialize")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["requests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn delete_request_then_transition_is_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_staff_and_managers(&client, &srv).await;
    let product_id = create_product(&client, &srv, "Widget").await;

    let res = post_json(
        &client,
        srv.url("/purchase-requests"),
        json!({
            "requester_email": "alice@x.com",
            "items": [{"product_id": product_id, "quantity": 1, "unit": "piece"}],
            "notes": ""
        }),
    )
    .await;
    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();
    let url = srv.url(&format!("/purchase-requests/{id}"));

    let res = client.delete(url.clone()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = put_json(
        &client,
        url,
        json!({"status": "approved", "caller_email": "bob@x.com"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn initialize_returns_the_joined_world() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    seed_staff_and_managers(&client, &srv).await;

    let res = post_json(
        &client,
        srv.url("/suppliers"),
        json!({"name": "Acme", "contact": "+1 555 0100"}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let supplier: Value = res.json().await.unwrap();

    let res = post_json(
        &client,
        srv.url("/products"),
        json!({"name": "Widget", "unit": "piece", "min_stock": 0, "supplier_id": supplier["id"]}),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await.unwrap();

    post_json(
        &client,
        srv.url("/movements"),
        json!({"product_id": product["id"], "type": "inflow", "quantity": 2, "acting_user_email": "alice@x.com"}),
    )
    .await;

    let res = post_json(
        &client,
        srv.url("/purchase-requests"),
        json!({
            "requester_email": "alice@x.com",
            "items": [{"product_id": product["id"], "quantity": 1, "unit": "piece"}],
            "notes": ""
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.get(srv.url("/initialize")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["users"].as_array().unwrap().len(), 4);
    assert!(body["users"][0].get("credential_hash").is_none());
    assert_eq!(body["products"][0]["supplier"]["name"], "Acme");
    assert_eq!(body["recent_movements"].as_array().unwrap().len(), 1);
    let request = &body["requests"][0];
    assert_eq!(request["requester_user"]["display_name"], "Alice");
    assert_eq!(request["items"][0]["product"]["name"], "Widget");
}
