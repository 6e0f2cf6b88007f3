use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use workshop_management::config::environment::EnvironmentConfig;
use workshop_management::models::auth::UserRole;
use workshop_management::models::user::NewUser;
use workshop_management::repositories::Store;
use workshop_management::routes::create_app;
use workshop_management::state::AppState;

const PASSWORD: &str = "secreto123";

async fn seed_user(store: &Store, email: &str, role: UserRole) {
    store
        .users
        .create(NewUser {
            email: email.to_string(),
            name: format!("Usuario {}", role.as_str()),
            role,
            active: true,
            password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
        })
        .await
        .unwrap();
}

async fn create_test_app() -> Router {
    let store = Store::in_memory();
    seed_user(&store, "admin@taller.es", UserRole::Admin).await;
    seed_user(&store, "tecnico@taller.es", UserRole::Technician).await;
    create_app(AppState::new(store, EnvironmentConfig::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let (status, bytes) = send(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_client(app: &Router, token: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/clients",
        Some(token),
        Some(json!({ "name": "Talleres Norte", "tax_id": "B12345678" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let (status, body) = send_json(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_login_and_me() {
    let app = create_test_app().await;
    let token = login(&app, "admin@taller.es").await;

    let (status, body) = send_json(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "admin@taller.es");
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "admin@taller.es", "password": "incorrecta" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = create_test_app().await;

    let (status, _) = send_json(&app, "GET", "/api/clients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, "GET", "/api/clients", Some("no-es-un-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_technician_cannot_create_client() {
    let app = create_test_app().await;
    let token = login(&app, "tecnico@taller.es").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/clients",
        Some(&token),
        Some(json!({ "name": "Talleres Norte", "tax_id": "B12345678" })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_work_order_lifecycle() {
    let app = create_test_app().await;
    let admin = login(&app, "admin@taller.es").await;
    let client_id = create_client(&app, &admin).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/work-orders",
        Some(&admin),
        Some(json!({ "client_id": client_id, "description": "Cambio de aceite" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/work-orders/{}/start", order_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["work_order"]["status"], "in_progress");
    assert_eq!(body["data"]["punch"]["kind"], "entrance");

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/work-orders/{}/start", order_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/work-orders/{}/close", order_id),
        Some(&admin),
        Some(json!({ "work_performed": "Aceite y filtro cambiados" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["work_performed"], "Aceite y filtro cambiados");

    let (status, body) = send_json(
        &app,
        "GET",
        &format!("/api/work-orders/{}/punches", order_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_close_requires_work_performed() {
    let app = create_test_app().await;
    let admin = login(&app, "admin@taller.es").await;
    let client_id = create_client(&app, &admin).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/work-orders",
        Some(&admin),
        Some(json!({ "client_id": client_id, "description": "Revisión de frenos" })),
    )
    .await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        "POST",
        &format!("/api/work-orders/{}/close", order_id),
        Some(&admin),
        Some(json!({ "work_performed": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_import_rejects_row_without_cif() {
    let app = create_test_app().await;
    let admin = login(&app, "admin@taller.es").await;

    let csv = "name,cif,phone\nTalleres Norte,,600111222\nGrúas Sur,B87654321,\n";
    let request = Request::builder()
        .method("POST")
        .uri("/api/clients/import")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin))
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv))
        .unwrap();

    let (status, bytes) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "IMPORT_REJECTED");
    assert_eq!(body["details"]["rows"][0]["row"], 2);
    assert_eq!(body["details"]["rows"][0]["field"], "cif");

    let (_, clients) = send_json(&app, "GET", "/api/clients", Some(&admin), None).await;
    assert!(clients.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_clock_in_twice_conflicts() {
    let app = create_test_app().await;
    let token = login(&app, "tecnico@taller.es").await;

    let (status, _) = send_json(&app, "POST", "/api/punches/clock-in", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "POST", "/api/punches/clock-in", Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send_json(&app, "GET", "/api/punches/status", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clocked_in"], true);
}

#[tokio::test]
async fn test_punch_report_is_html() {
    let app = create_test_app().await;
    let admin = login(&app, "admin@taller.es").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/reports/punches")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(response.headers().contains_key(header::CONTENT_DISPOSITION));
}
