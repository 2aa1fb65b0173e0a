//! Registration, login and bearer-token enforcement over HTTP.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::json;
use shop_core::models::auth::Role;

#[tokio::test]
async fn register_login_and_read_profile() {
    let app = TestApp::new();
    let body = json!({"username": "alice", "password": "pw1", "email": "a@x.com"});

    let (status, resp) = app.post("/registration", None, body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["message"], "User registered!");

    let (status, resp) = app.post("/registration", None, body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["error"], "conflict");

    let (status, resp) = app
        .post("/login", None, json!({"nameoremail": "alice", "password": "pw1"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = resp["token"].as_str().expect("token").to_string();

    let (status, resp) = app.get("/profile", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["username"], "alice");
    assert_eq!(resp["email"], "a@x.com");
    assert_eq!(resp["role"], "customer");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.post(
        "/registration",
        None,
        json!({"username": "alice", "password": "pw1", "email": "a@x.com"}),
    )
    .await;

    let (status, resp) = app
        .post("/login", None, json!({"usernameOrEmail": "a@x.com", "password": "nope"}))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["message"], "Invalid credentials");
}

#[tokio::test]
async fn protected_route_requires_a_valid_bearer_token() {
    let app = TestApp::new();
    app.user("alice", Role::Customer).await;

    let (status, resp) = app.get("/profile", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["error"], "unauthorized");

    let (status, _) = app.get("/profile", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let expired = app.token_issued_at("alice", Utc::now() - Duration::hours(2));
    let (status, _) = app.get("/profile", Some(&expired)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let fresh = app.token_for("alice");
    let (status, _) = app.get("/profile", Some(&fresh)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = TestApp::new();
    app.user("alice", Role::Customer).await;
    let other = shop_core::auth::jwt::TokenCodec::new(b"some-other-secret")
        .issue("alice", Utc::now())
        .unwrap();

    let (status, _) = app.get("/profile", Some(&other)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_missing_account_is_a_server_error() {
    let app = TestApp::new();
    let ghost = app.token_for("ghost");

    let (status, resp) = app.get("/profile", Some(&ghost)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["error"], "internal_error");
    assert_eq!(resp["message"], "Internal server error");
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = TestApp::new();
    let (status, resp) = app.get("/products", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!([]));

    let (status, _) = app.call(Method::POST, "/cart/add", None, Some(json!([]))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn second_admin_cannot_self_register() {
    let app = TestApp::new();
    let (status, _) = app
        .post(
            "/registration",
            None,
            json!({"username": "root", "password": "pw", "email": "r@x.com", "role": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, resp) = app
        .post(
            "/registration",
            None,
            json!({"username": "eve", "password": "pw", "email": "e@x.com", "role": "admin"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["error"], "forbidden");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admin_signups_admit_exactly_one() {
    let app = Arc::new(TestApp::new());

    let signups: Vec<_> = (0..4)
        .map(|i| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                app.post(
                    "/registration",
                    None,
                    json!({
                        "username": format!("admin{i}"),
                        "password": "pw",
                        "email": format!("admin{i}@x.com"),
                        "role": "admin"
                    }),
                )
                .await
            })
        })
        .collect();

    let mut admitted = 0;
    for signup in signups {
        let (status, resp) = signup.await.unwrap();
        if status == StatusCode::OK {
            admitted += 1;
        } else {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(resp["error"], "forbidden");
        }
    }
    assert_eq!(admitted, 1);
}
