//! Cross-origin headers for the mobile API

use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Requested-With";

/// Exact-match origin allow-list
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(config: &CorsConfig) -> Self {
        Self {
            allowed_origins: config.allowed_origins.clone(),
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed == origin)
    }

    /// The request's origin, if it is on the allow-list
    fn allowed_origin(&self, headers: &HeaderMap) -> Option<HeaderValue> {
        headers
            .get(header::ORIGIN)
            .filter(|origin| origin.to_str().is_ok_and(|o| self.is_allowed(o)))
            .cloned()
    }

    fn decorate(&self, headers: &mut HeaderMap, origin: Option<HeaderValue>) {
        if let Some(origin) = origin {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }
}

/// Answer preflights directly and decorate every other mobile response.
///
/// Preflights never reach a handler. Authentication stays with the handlers.
pub async fn handle_mobile(policy: &CorsPolicy, req: Request, next: Next) -> Response {
    let origin = policy.allowed_origin(req.headers());

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        policy.decorate(response.headers_mut(), origin);
        return response;
    }

    let mut response = next.run(req).await;
    if origin.is_some() {
        policy.decorate(response.headers_mut(), origin);
    }
    response
}
