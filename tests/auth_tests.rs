//! Token, session, and startup configuration tests

use axum::http::{header, HeaderMap, HeaderValue};
use docsave::auth::models::User;
use docsave::auth::session::{self, SessionStatus, Transport};
use docsave::auth::{PasswordHasher, TokenIssuer};
use docsave::config::{load_config_from_path, Config};
use docsave::{AppState, Error, Store};
use std::io::Write;
use tempfile::NamedTempFile;

fn user() -> User {
    User::new("Ada".into(), "ada@example.com".into(), String::new())
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

fn cookie(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("theme=dark; token={}; lang=en", token)).unwrap(),
    );
    headers
}

#[test]
fn test_same_token_resolves_over_both_transports() {
    let issuer = TokenIssuer::new("shared-secret").unwrap();
    let user = user();
    let token = issuer.issue(&user, chrono::Duration::days(7)).unwrap();

    let via_cookie = session::resolve(&cookie(&token), Transport::Cookie, &issuer);
    let via_bearer = session::resolve(&bearer(&token), Transport::Bearer, &issuer);

    assert_eq!(via_cookie.claims().unwrap().user_id(), Some(user.id));
    assert_eq!(via_bearer.claims().unwrap().user_id(), Some(user.id));
}

#[test]
fn test_transports_do_not_cross() {
    let issuer = TokenIssuer::new("shared-secret").unwrap();
    let token = issuer.issue(&user(), chrono::Duration::days(7)).unwrap();

    assert!(matches!(
        session::resolve(&cookie(&token), Transport::Bearer, &issuer),
        SessionStatus::Missing
    ));
    assert!(matches!(
        session::resolve(&bearer(&token), Transport::Cookie, &issuer),
        SessionStatus::Missing
    ));
}

#[test]
fn test_foreign_signature_is_invalid() {
    let ours = TokenIssuer::new("ours").unwrap();
    let theirs = TokenIssuer::new("theirs").unwrap();
    let token = theirs.issue(&user(), chrono::Duration::days(1)).unwrap();

    assert!(matches!(
        session::resolve(&bearer(&token), Transport::Bearer, &ours),
        SessionStatus::Invalid
    ));
}

#[test]
fn test_expiry_is_exact() {
    let issuer = TokenIssuer::new("clock").unwrap();
    let now = 1_700_000_000;
    let token = issuer.issue_at(&user(), chrono::Duration::seconds(60), now).unwrap();

    assert!(issuer.verify_at(&token, now + 59).is_ok());
    assert!(issuer.verify_at(&token, now + 60).is_err());
}

#[test]
fn test_state_refuses_empty_secret() {
    let config = Config::default();
    let err = AppState::new(config, Store::memory()).err().unwrap();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_secret_from_environment() {
    std::env::set_var("DOCSAVE_AUTH_TEST_SECRET", "from-env");
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[auth]
jwt_secret = "${{DOCSAVE_AUTH_TEST_SECRET}}"
bcrypt_cost = 4
"#
    )
    .unwrap();

    let config = load_config_from_path(file.path()).unwrap();
    assert_eq!(config.auth.jwt_secret, "from-env");
    assert!(AppState::new(config, Store::memory()).is_ok());
}

#[tokio::test]
async fn test_password_hashes_are_salted() {
    let hasher = PasswordHasher::new(4);
    let first = hasher.hash("secret123").await.unwrap();
    let second = hasher.hash("secret123").await.unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("secret123", &first).await.unwrap());
    assert!(hasher.verify("secret123", &second).await.unwrap());
    assert!(!hasher.verify("secret124", &first).await.unwrap());
}
