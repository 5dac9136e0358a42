use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use characters_api::{build_app, config::AppConfig, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_app(AppState::in_memory(AppConfig::for_tests()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn rick() -> Value {
    json!({
        "name": "Rick Sanchez",
        "gender": "Male",
        "ocupation": "Scientist",
        "image": "https://img.example/rick.png"
    })
}

async fn signup_and_login(app: &Router, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/signup",
        Some(json!({"email": email, "name": "Ana", "address": "Calle Mayor 1", "password": "secret123"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        Some(json!({"email": email, "password": "secret123"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let res = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn character_crud_round_trip() {
    let app = app();

    let (status, created) = send(&app, Method::POST, "/newCharacter", Some(rick()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["success"], true);
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&app, Method::GET, &format!("/characters/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["results"]["name"], "Rick Sanchez");
    assert_eq!(fetched["results"]["ocupation"], "Scientist");
    assert_eq!(fetched["results"]["id"], id);

    let (_, list) = send(&app, Method::GET, "/characters", None, None).await;
    assert_eq!(list["info"]["count"], 1);
    assert_eq!(list["results"].as_array().unwrap().len(), 1);

    let mut changed = rick();
    changed["name"] = json!("Morty Smith");
    let (status, updated) =
        send(&app, Method::PUT, &format!("/characters/{id}"), Some(changed), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["success"], true);

    let (status, deleted) = send(&app, Method::DELETE, &format!("/characters/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], true);

    let (status, missing) = send(&app, Method::GET, &format!("/characters/{id}"), None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(missing["success"], false);
}

#[tokio::test]
async fn update_and_delete_of_missing_id_are_not_success() {
    let app = app();
    let (status, updated) = send(&app, Method::PUT, "/characters/404", Some(rick()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["success"], false);
    assert_eq!(updated["message"], "This character does not exist");

    let (status, deleted) = send(&app, Method::DELETE, "/characters/404", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["success"], false);
}

#[tokio::test]
async fn signup_conflict_is_409() {
    let app = app();
    signup_and_login(&app, "ana@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/signup",
        Some(json!({"email": "ana@example.com", "name": "B", "address": "C", "password": "other"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn signup_with_invalid_email_is_400() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/signup",
        Some(json!({"email": "nope", "name": "B", "address": "C", "password": "x"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_is_400() {
    let app = app();
    signup_and_login(&app, "ana@example.com").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        Some(json!({"email": "ana@example.com", "password": "wrong"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "message": "Invalid credentials"}));
}

#[tokio::test]
async fn profile_requires_token_and_never_leaks_password() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/userProfile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/userProfile", None, Some("forged.token.value")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = signup_and_login(&app, "ana@example.com").await;
    let (status, body) = send(&app, Method::GET, "/userProfile", None, Some(token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["address"], "Calle Mayor 1");
    let text = body.to_string();
    assert!(!text.contains("secret123"));
    assert!(!text.contains("hashed_password"));
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = app();
    let token = signup_and_login(&app, "ana@example.com").await;

    let (status, body) = send(&app, Method::PUT, "/logout", None, Some(token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, Method::GET, "/userProfile", None, Some(token.as_str())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "token revoked");

    let (status, body) = send(&app, Method::PUT, "/logout", None, Some(token.as_str())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "msg": "Error"}));
}

#[tokio::test]
async fn logout_without_header_reports_error() {
    let (status, body) = send(&app(), Method::PUT, "/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Error");
}

#[tokio::test]
async fn signup_with_missing_field_is_400_envelope() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/signup",
        Some(json!({"email": "a@b.io", "password": "x"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn login_with_missing_field_is_400_envelope() {
    let (status, body) = send(&app(), Method::POST, "/login", Some(json!({"email": "a@b.io"})), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn login_without_json_content_type_is_400_envelope() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/login")
        .body(Body::from("email=a@b.io"))
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_character_requests_are_400_envelope() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/newCharacter",
        Some(json!({"name": "Rick Sanchez"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, Method::GET, "/characters/not-a-number", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
