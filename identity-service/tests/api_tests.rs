mod common;

use common::StubGoogleProvider;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

async fn sign_up(app: &TestApp, email: &str, password: &str) -> reqwest::Response {
    app.post("/auth/signup")
        .json(&json!({
            "email": email,
            "password": password,
            "fullName": "Ada Lovelace"
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn sign_in(app: &TestApp, email: &str, password: &str) -> reqwest::Response {
    app.post("/auth/signin")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn google(app: &TestApp, code: &str) -> reqwest::Response {
    app.post("/auth/google")
        .json(&json!({ "code": code }))
        .send()
        .await
        .expect("Failed to execute request")
}

async fn json_body(response: reqwest::Response) -> serde_json::Value {
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_sign_up_success() {
    let app = TestApp::spawn().await;

    let response = sign_up(&app, "ada@example.com", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["statusCode"], 201);
    assert_eq!(body["message"], "User created successfully");

    let account_id = body["data"]["accountId"].as_str().unwrap().to_string();
    let token = body["data"]["token"].as_str().unwrap();
    assert_eq!(app.token_subject(token), account_id);
}

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let app = TestApp::spawn().await;

    let signed_up = json_body(sign_up(&app, "ada@example.com", "Passw0rd!").await).await;
    let response = sign_in(&app, "ada@example.com", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::OK);
    let signed_in = json_body(response).await;
    assert_eq!(signed_in["message"], "Login successful");
    assert_eq!(signed_in["data"]["accountId"], signed_up["data"]["accountId"]);
    assert_eq!(
        app.token_subject(signed_in["data"]["token"].as_str().unwrap()),
        signed_up["data"]["accountId"].as_str().unwrap()
    );
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let app = TestApp::spawn().await;

    sign_up(&app, "ada@example.com", "Passw0rd!").await;
    let response = sign_up(&app, "ada@example.com", "Other!pass1").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["message"], "User with this email already exists");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_concurrent_sign_ups_single_winner() {
    let app = TestApp::spawn().await;

    let (first, second) = tokio::join!(
        sign_up(&app, "race@example.com", "Passw0rd!"),
        sign_up(&app, "race@example.com", "Passw0rd?")
    );

    let mut statuses = [first.status(), second.status()];
    statuses.sort_by_key(|s| s.as_u16());
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::FORBIDDEN]);
    assert_eq!(app.repository.len().await, 1);
}

#[tokio::test]
async fn test_sign_up_invalid_email() {
    let app = TestApp::spawn().await;

    let response = sign_up(&app, "not-an-email", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("email"));
}

#[tokio::test]
async fn test_sign_up_weak_password() {
    let app = TestApp::spawn().await;

    let response = sign_up(&app, "ada@example.com", "password").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("upper, lower, number & symbol"));
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn test_sign_up_blank_full_name() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/auth/signup")
        .json(&json!({
            "email": "ada@example.com",
            "password": "Passw0rd!",
            "fullName": "   "
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_sign_in_unknown_email() {
    let app = TestApp::spawn().await;

    let response = sign_in(&app, "nobody@example.com", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let app = TestApp::spawn().await;
    sign_up(&app, "ada@example.com", "Passw0rd!").await;

    let response = sign_in(&app, "ada@example.com", "Passw0rd?").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_google_sign_in_creates_account_once() {
    let provider = StubGoogleProvider::default()
        .with_code("code-1", "ada@gmail.com", "Ada")
        .with_code("code-2", "ada@gmail.com", "Ada Renamed");
    let app = TestApp::spawn_with(common::JWT_SECRET, provider).await;

    let first = google(&app, "code-1").await;
    assert_eq!(first.status(), StatusCode::OK);
    let first = json_body(first).await;

    let second = json_body(google(&app, "code-2").await).await;

    assert_eq!(first["data"]["accountId"], second["data"]["accountId"]);
    assert_eq!(app.repository.len().await, 1);

    let token = second["data"]["token"].as_str().unwrap();
    let me = json_body(app.get_authenticated("/auth/me", token).send().await.unwrap()).await;
    assert_eq!(me["data"]["provider"], "GOOGLE");
    assert_eq!(me["data"]["fullName"], "Ada");
    assert_eq!(
        me["data"]["avatarUrl"],
        "https://lh3.googleusercontent.com/a/code-1"
    );
}

#[tokio::test]
async fn test_password_sign_in_on_google_account() {
    let provider = StubGoogleProvider::default().with_code("code-1", "ada@gmail.com", "Ada");
    let app = TestApp::spawn_with(common::JWT_SECRET, provider).await;
    google(&app, "code-1").await;

    let response = sign_in(&app, "ada@gmail.com", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("GOOGLE"));
}

#[tokio::test]
async fn test_sign_up_after_google_account_is_duplicate() {
    let provider = StubGoogleProvider::default().with_code("code-1", "ada@gmail.com", "Ada");
    let app = TestApp::spawn_with(common::JWT_SECRET, provider).await;
    google(&app, "code-1").await;

    let response = sign_up(&app, "ada@gmail.com", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_google_rejected_code() {
    let app = TestApp::spawn().await;

    let response = google(&app, "expired-code").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(app.repository.is_empty().await);
}

#[tokio::test]
async fn test_google_empty_code() {
    let app = TestApp::spawn().await;

    let response = google(&app, " ").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_google_auth_url() {
    let app = TestApp::spawn().await;

    let response = app.get("/auth/google/url").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["data"]["url"]
        .as_str()
        .unwrap()
        .starts_with("https://accounts.google.com/"));
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::spawn().await;

    let missing = app.get("/auth/me").send().await.unwrap();
    let garbage = app
        .get_authenticated("/auth/me", "not.a.token")
        .send()
        .await
        .unwrap();

    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_token() {
    let app = TestApp::spawn().await;
    let body = json_body(sign_up(&app, "ada@example.com", "Passw0rd!").await).await;
    let token = body["data"]["token"].as_str().unwrap();

    let response = app.get_authenticated("/auth/me", token).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let me = json_body(response).await;
    assert_eq!(me["data"]["id"], body["data"]["accountId"]);
    assert_eq!(me["data"]["email"], "ada@example.com");
    assert_eq!(me["data"]["provider"], "LOCAL");
    assert_eq!(me["data"]["fullName"], "Ada Lovelace");
}

#[tokio::test]
async fn test_me_with_token_from_other_secret() {
    let app = TestApp::spawn().await;
    let other = auth::Authenticator::new(
        b"another-secret-key-that-is-32-bytes-long",
        chrono::Duration::hours(1),
    );
    let forged = other
        .issue_token(uuid::Uuid::new_v4())
        .expect("token should be issued");

    let response = app.get_authenticated("/auth/me", &forged).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_signing_secret_is_internal_error() {
    let app = TestApp::spawn_with(b"", StubGoogleProvider::default()).await;

    let response = sign_up(&app, "ada@example.com", "Passw0rd!").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Internal server error");
    assert!(app.repository.is_empty().await);
}
