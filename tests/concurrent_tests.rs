//! Concurrent request tests
//! Races registrations and logins through the router
//!
//! Run with: cargo test --test concurrent_tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use docsave::config::Config;
use docsave::{create_router, AppState, Store};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Store) {
    let mut config = Config::default();
    config.auth.jwt_secret = "concurrent-secret".to_string();
    config.auth.bcrypt_cost = 4;

    let store = Store::memory();
    let state = AppState::new(config, store.clone()).expect("valid test config");
    (create_router(Arc::new(state)), store)
}

fn register_request(name: &str, email: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"name": name, "email": email, "password": "secret123"}).to_string(),
        ))
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_same_email() {
    let (app, store) = test_app();
    let attempts = 16;

    let mut handles = Vec::new();
    for i in 0..attempts {
        let app = app.clone();
        // Mixed case so only normalization makes them collide
        let email = if i % 2 == 0 {
            "race@example.com"
        } else {
            "RACE@example.com"
        };
        let name = format!("Racer {}", i);
        handles.push(tokio::spawn(async move {
            app.oneshot(register_request(&name, email))
                .await
                .unwrap()
                .status()
        }));
    }

    let mut created = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, attempts - 1);
    assert!(store.users.find_by_email("race@example.com").await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_distinct_emails() {
    let (app, store) = test_app();

    let mut handles = Vec::new();
    for i in 0..10 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let email = format!("user{}@example.com", i);
            app.oneshot(register_request("Someone", &email))
                .await
                .unwrap()
                .status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }
    for i in 0..10 {
        let email = format!("user{}@example.com", i);
        assert!(store.users.find_by_email(&email).await.unwrap().is_some());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_logins() {
    let (app, _) = test_app();
    let status = app
        .clone()
        .oneshot(register_request("Ada", "ada@example.com"))
        .await
        .unwrap()
        .status();
    assert_eq!(status, StatusCode::CREATED);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let req = Request::builder()
                .method(Method::POST)
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": "ada@example.com", "password": "secret123"}).to_string(),
                ))
                .unwrap();
            app.oneshot(req).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
}
