//! Integration tests for the HR directory backend.

use std::sync::Arc;

use reqwest::{Client, Response};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::auth::TokenService;
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            api_psk: psk.clone(),
            jwt_secret: Some("test-token-secret".to_string()),
            jwt_ttl_minutes: 60,
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_json: false,
            seed_demo_data: false,
        };

        let state = AppState {
            repo,
            tokens: Arc::new(TokenService::from_config(&config)),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Value) -> Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn put(&self, path: &str, body: Value, token: Option<&str>) -> Response {
        let mut request = self.client.put(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request.send().await.unwrap()
    }

    async fn delete(&self, path: &str) -> Response {
        self.client.delete(self.url(path)).send().await.unwrap()
    }

    async fn create_department(&self, id: i64, name: &str) {
        let resp = self
            .post("/api/departments", json!({ "id": id, "name": name }))
            .await;
        assert_eq!(resp.status(), 200);
    }

    async fn create_employee(&self, body: Value) -> Value {
        let resp = self.post("/api/employees", body).await;
        assert_eq!(resp.status(), 200);
        resp.json().await.unwrap()
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let resp = self
            .post("/api/login", json!({ "email": email, "password": password }))
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    /// Admin employee 1 plus a logged-in admin token.
    async fn admin_token(&self) -> String {
        self.create_department(1, "HR").await;
        self.create_employee(json!({
            "id": 1,
            "name": "Admin User",
            "mail": "admin@example.com",
            "password": "admin123",
            "role": "admin",
            "department": 1
        }))
        .await;
        self.login("admin@example.com", "admin123").await
    }
}

async fn error_message(resp: Response) -> String {
    let body: Value = resp.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(error_message(resp).await, "Missing API key");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let resp = Client::new()
        .get(fixture.url("/api/users"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    assert_eq!(error_message(resp).await, "Invalid API key");
}

#[tokio::test]
async fn test_no_psk_configured_allows_requests() {
    let fixture = TestFixture::with_psk(None).await;

    let resp = fixture.get("/api/departments").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_employee_create_mirrors_user() {
    let fixture = TestFixture::new().await;
    fixture.create_department(3, "Finance").await;

    let employee = fixture
        .create_employee(json!({
            "id": 42,
            "name": "Ana",
            "mail": "ana@x.io",
            "password": "pw",
            "role": "employee",
            "department": "3"
        }))
        .await;
    assert_eq!(employee["department"], 3);
    assert!(employee.get("password").is_none());

    let resp = fixture.get("/api/users/42").await;
    assert_eq!(resp.status(), 200);
    let user: Value = resp.json().await.unwrap();
    assert_eq!(user["name"], "Ana");
    assert_eq!(user["email"], "ana@x.io");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());

    // The mirrored user can log in with the employee's password
    fixture.login("ana@x.io", "pw").await;
}

#[tokio::test]
async fn test_sync_is_idempotent_and_repairs_drift() {
    let fixture = TestFixture::new().await;
    fixture.create_department(1, "HR").await;
    fixture
        .create_employee(json!({
            "id": 7, "name": "Bo", "mail": "bo@x.io", "password": "pw", "department": 1
        }))
        .await;

    let resp = fixture.get("/api/sync-users").await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Users synced from employees successfully");
    assert_eq!(body["report"]["examined"], 1);
    assert_eq!(body["report"]["created"], 0);
    assert_eq!(body["report"]["updated"], 0);

    // Drift the mirrored user, then reconcile it back
    let resp = fixture
        .put("/api/users/7", json!({ "name": "Drifted" }), None)
        .await;
    assert_eq!(resp.status(), 200);

    let body: Value = fixture.get("/api/sync-users").await.json().await.unwrap();
    assert_eq!(body["report"]["updated"], 1);

    let user: Value = fixture.get("/api/users/7").await.json().await.unwrap();
    assert_eq!(user["name"], "Bo");
}

#[tokio::test]
async fn test_role_changes_require_admin() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin_token().await;

    fixture
        .create_employee(json!({
            "id": 7, "name": "Bo", "mail": "bo@x.io", "password": "pw", "department": 1
        }))
        .await;
    let resp = fixture
        .post(
            "/api/users",
            json!({ "id": 5, "name": "Cy", "email": "cy@x.io", "password": "pw" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let regular = fixture.login("cy@x.io", "pw").await;

    // Own role
    let resp = fixture
        .put("/api/users/5", json!({ "role": "admin" }), Some(&regular))
        .await;
    assert_eq!(resp.status(), 403);
    assert_eq!(error_message(resp).await, "Users cannot update their own role");

    // Someone else's role
    let resp = fixture
        .put("/api/employees/7", json!({ "role": "admin" }), Some(&regular))
        .await;
    assert_eq!(resp.status(), 403);
    assert_eq!(error_message(resp).await, "Only admins can update employee roles");

    let employee: Value = fixture.get("/api/employees/7").await.json().await.unwrap();
    assert_eq!(employee["role"], "employee");

    // Admin succeeds and the role reaches the mirrored user
    let resp = fixture
        .put("/api/employees/7", json!({ "role": "admin" }), Some(&admin))
        .await;
    assert_eq!(resp.status(), 200);
    let user: Value = fixture.get("/api/users/7").await.json().await.unwrap();
    assert_eq!(user["role"], "admin");

    // Demoting through the user pushes "employee" to the paired employee
    let resp = fixture
        .put("/api/users/7", json!({ "role": "user" }), Some(&admin))
        .await;
    assert_eq!(resp.status(), 200);
    let employee: Value = fixture.get("/api/employees/7").await.json().await.unwrap();
    assert_eq!(employee["role"], "employee");
}

#[tokio::test]
async fn test_role_change_without_token_is_unauthorized() {
    let fixture = TestFixture::new().await;
    fixture
        .post(
            "/api/users",
            json!({ "id": 5, "name": "Cy", "email": "cy@x.io", "password": "pw" }),
        )
        .await;

    let resp = fixture
        .put("/api/users/5", json!({ "role": "admin" }), None)
        .await;
    assert_eq!(resp.status(), 401);
    assert_eq!(
        error_message(resp).await,
        "Authentication required to change roles"
    );

    let resp = fixture
        .put("/api/users/5", json!({ "role": "admin" }), Some("not-a-token"))
        .await;
    assert_eq!(resp.status(), 401);

    // Updates without a role need no token
    let resp = fixture
        .put("/api/users/5", json!({ "name": "Cyrus" }), None)
        .await;
    assert_eq!(resp.status(), 200);
    let user: Value = resp.json().await.unwrap();
    assert_eq!(user["name"], "Cyrus");
    assert_eq!(user["role"], "user");
}

#[tokio::test]
async fn test_invalid_employee_role_rejected() {
    let fixture = TestFixture::new().await;
    let admin = fixture.admin_token().await;

    let resp = fixture
        .post(
            "/api/employees",
            json!({ "name": "Di", "mail": "di@x.io", "password": "pw", "role": "boss" }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = fixture
        .put("/api/employees/1", json!({ "role": "boss" }), Some(&admin))
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_department_delete_guard() {
    let fixture = TestFixture::new().await;
    fixture.create_department(3, "Finance").await;
    fixture.create_department(4, "Legal").await;
    fixture
        .create_employee(json!({
            "id": 9, "name": "Ed", "mail": "ed@x.io", "password": "pw", "department": 3
        }))
        .await;

    let resp = fixture.delete("/api/departments/3").await;
    assert_eq!(resp.status(), 400);
    assert_eq!(
        error_message(resp).await,
        "Cannot delete department: employees are assigned to this department"
    );
    assert_eq!(fixture.get("/api/departments/3").await.status(), 200);

    let resp = fixture
        .put("/api/employees/9", json!({ "department": 4 }), None)
        .await;
    assert_eq!(resp.status(), 200);

    let resp = fixture.delete("/api/departments/3").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(fixture.get("/api/departments/3").await.status(), 404);

    assert_eq!(fixture.delete("/api/departments/3").await.status(), 404);
}

#[tokio::test]
async fn test_employee_delete_cascades() {
    let fixture = TestFixture::new().await;
    fixture.create_department(1, "HR").await;
    fixture
        .create_employee(json!({
            "id": 7, "name": "Bo", "mail": "bo@x.io", "password": "pw", "department": 1
        }))
        .await;

    let resp = fixture
        .post(
            "/api/projects",
            json!({
                "id": 100,
                "name": "Payroll",
                "departmentResponsible": 1,
                "employeeResponsible": 7,
                "startDate": "2024-01-01"
            }),
        )
        .await;
    assert_eq!(resp.status(), 200);

    let projects: Value = fixture.get("/api/projects").await.json().await.unwrap();
    assert_eq!(projects[0]["employeeResponsibleName"], "Bo");
    assert_eq!(projects[0]["departmentResponsibleName"], "HR");

    let resp = fixture.delete("/api/employees/7").await;
    assert_eq!(resp.status(), 200);

    assert_eq!(fixture.get("/api/employees/7").await.status(), 404);
    assert_eq!(fixture.get("/api/users/7").await.status(), 404);

    let project: Value = fixture.get("/api/projects/100").await.json().await.unwrap();
    assert!(project.get("employeeResponsible").is_none());
    assert_eq!(project["employeeResponsibleName"], "");
    assert_eq!(project["departmentResponsible"], 1);

    assert_eq!(fixture.delete("/api/employees/7").await.status(), 404);
}

#[tokio::test]
async fn test_user_delete_removes_employee_but_keeps_project_reference() {
    let fixture = TestFixture::new().await;
    fixture.create_department(1, "HR").await;
    fixture
        .create_employee(json!({
            "id": 7, "name": "Bo", "mail": "bo@x.io", "password": "pw", "department": 1
        }))
        .await;
    fixture
        .post(
            "/api/projects",
            json!({ "id": 100, "name": "Payroll", "employeeResponsible": 7 }),
        )
        .await;

    let resp = fixture.delete("/api/users/7").await;
    assert_eq!(resp.status(), 200);

    assert_eq!(fixture.get("/api/users/7").await.status(), 404);
    assert_eq!(fixture.get("/api/employees/7").await.status(), 404);

    let project: Value = fixture.get("/api/projects/100").await.json().await.unwrap();
    assert_eq!(project["employeeResponsible"], 7);

    assert_eq!(fixture.delete("/api/users/7").await.status(), 404);
}

#[tokio::test]
async fn test_login() {
    let fixture = TestFixture::new().await;
    fixture.admin_token().await;

    let resp = fixture
        .post(
            "/api/login",
            json!({ "email": "admin@example.com", "password": "admin123" }),
        )
        .await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["role"], "admin");
    assert_eq!(body["name"], "Admin User");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body.get("password").is_none());

    let wrong_password = fixture
        .post(
            "/api/login",
            json!({ "email": "admin@example.com", "password": "nope" }),
        )
        .await;
    let unknown_email = fixture
        .post(
            "/api/login",
            json!({ "email": "ghost@example.com", "password": "admin123" }),
        )
        .await;
    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_email.status(), 401);
    assert_eq!(
        error_message(wrong_password).await,
        error_message(unknown_email).await
    );

    let resp = fixture
        .post("/api/login", json!({ "email": "admin@example.com" }))
        .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(error_message(resp).await, "Email and password are required");
}

#[tokio::test]
async fn test_report_ids_and_extra_fields() {
    let fixture = TestFixture::new().await;

    let first: Value = fixture
        .post(
            "/api/reports",
            json!({ "title": "Q1", "generatedBy": "Admin", "content": "ok", "priority": "high" }),
        )
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(first["priority"], "high");
    assert!(first["date"].as_str().is_some());

    let second: Value = fixture
        .post("/api/reports", json!({ "title": "Q2" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(second["id"], 2);

    let resp = fixture
        .put("/api/reports/1", json!({ "content": "revised" }), None)
        .await;
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["content"], "revised");
    assert_eq!(updated["priority"], "high");

    let resp = fixture.post("/api/reports", json!({ "content": "x" })).await;
    assert_eq!(resp.status(), 400);

    assert_eq!(fixture.delete("/api/reports/2").await.status(), 200);
    assert_eq!(fixture.get("/api/reports/2").await.status(), 404);
}

#[tokio::test]
async fn test_validation_and_conflicts() {
    let fixture = TestFixture::new().await;
    fixture.create_department(1, "HR").await;

    // Unknown department
    let resp = fixture
        .post(
            "/api/employees",
            json!({ "name": "Fay", "mail": "fay@x.io", "password": "pw", "department": 99 }),
        )
        .await;
    assert_eq!(resp.status(), 400);
    assert_eq!(error_message(resp).await, "Invalid department id");

    let employee = fixture
        .create_employee(json!({ "name": "Fay", "mail": "fay@x.io", "password": "pw" }))
        .await;
    let path = format!("/api/employees/{}", employee["id"]);
    let resp = fixture.put(&path, json!({ "department": "99" }), None).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(error_message(resp).await, "Invalid department id");

    let path = format!("/api/users/{}", employee["id"]);
    let resp = fixture.put(&path, json!({ "name": "" }), None).await;
    assert_eq!(resp.status(), 400);
    let resp = fixture.put(&path, json!({ "email": "no-at-sign" }), None).await;
    assert_eq!(resp.status(), 400);

    // Duplicate id
    let resp = fixture.post("/api/departments", json!({ "id": 1, "name": "Dup" })).await;
    assert_eq!(resp.status(), 409);

    // Blank name
    let resp = fixture
        .post(
            "/api/users",
            json!({ "name": "  ", "email": "g@x.io", "password": "pw" }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    // Project without an id, and with a malformed date
    let resp = fixture.post("/api/projects", json!({ "name": "NoId" })).await;
    assert_eq!(resp.status(), 400);
    let resp = fixture
        .post(
            "/api/projects",
            json!({ "id": 3, "name": "Dated", "endDate": "31/12/2024" }),
        )
        .await;
    assert_eq!(resp.status(), 400);

    // Non-numeric path id
    let resp = fixture.get("/api/users/abc").await;
    assert_eq!(resp.status(), 400);
    assert!(!error_message(resp).await.is_empty());

    // Malformed body
    let resp = fixture
        .client
        .post(fixture.url("/api/departments"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_id_allocation_follows_max() {
    let fixture = TestFixture::new().await;

    let first: Value = fixture
        .post("/api/departments", json!({ "name": "HR" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first["id"], 1);

    fixture.create_department(10, "IT").await;

    let next: Value = fixture
        .post("/api/departments", json!({ "name": "Ops" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(next["id"], 11);
}

#[tokio::test]
async fn test_not_found_responses() {
    let fixture = TestFixture::new().await;

    for path in [
        "/api/users/404",
        "/api/employees/404",
        "/api/departments/404",
        "/api/projects/404",
        "/api/reports/404",
    ] {
        let resp = fixture.get(path).await;
        assert_eq!(resp.status(), 404, "{}", path);
        assert!(error_message(resp).await.ends_with("not found"));
    }

    let resp = fixture
        .put("/api/projects/404", json!({ "name": "Ghost" }), None)
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_login_with_shared_email() {
    let fixture = TestFixture::new().await;

    for (id, password) in [(1, "first"), (2, "second")] {
        let resp = fixture
            .post(
                "/api/users",
                json!({ "id": id, "name": "Dup", "email": "dup@x.io", "password": password }),
            )
            .await;
        assert_eq!(resp.status(), 200);
    }

    for (id, password) in [(1, "first"), (2, "second")] {
        let resp = fixture
            .post("/api/login", json!({ "email": "dup@x.io", "password": password }))
            .await;
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["id"], id);
    }

    let resp = fixture
        .post("/api/login", json!({ "email": "dup@x.io", "password": "third" }))
        .await;
    assert_eq!(resp.status(), 401);
    assert_eq!(error_message(resp).await, "Invalid email or password");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_employee_updates() {
    let fixture = TestFixture::new().await;
    fixture.create_department(1, "HR").await;
    fixture.create_department(2, "IT").await;

    for id in 1..=20 {
        fixture
            .create_employee(json!({
                "id": id,
                "name": format!("Employee {}", id),
                "mail": format!("e{}@x.io", id),
                "password": "pw",
                "department": 1
            }))
            .await;
    }

    let mut handles = Vec::new();
    for round in 0..3 {
        for id in 1..=20 {
            let client = fixture.client.clone();
            let url = fixture.url(&format!("/api/employees/{}", id));
            handles.push(tokio::spawn(async move {
                client
                    .put(url)
                    .json(&json!({ "name": format!("Renamed {} {}", id, round), "department": 2 }))
                    .send()
                    .await
                    .unwrap()
                    .status()
            }));
        }
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let employees: Value = fixture.get("/api/employees").await.json().await.unwrap();
    let employees = employees.as_array().unwrap();
    assert_eq!(employees.len(), 20);
    assert!(employees.iter().all(|e| e["department"] == 2));

    // Every mirrored user caught up once the writes settled
    let body: Value = fixture.get("/api/sync-users").await.json().await.unwrap();
    assert_eq!(body["report"]["failed"], 0);
    let users: Value = fixture.get("/api/users").await.json().await.unwrap();
    assert_eq!(users.as_array().unwrap().len(), 20);
}
