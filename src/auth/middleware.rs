//! Request gatekeeper
//!
//! Runs in front of every route. Mobile API requests only get CORS handling;
//! browser page requests are redirected based on the session cookie. JSON API
//! routes under `/api/` pass straight through and authenticate themselves.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::cors;
use crate::api::server::SharedState;
use crate::auth::session::{self, clear_session_cookie, SessionStatus, Transport};

pub const MOBILE_PREFIX: &str = "/api/mobile/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What the gatekeeper does with a browser request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    RedirectToLogin { clear_cookie: bool },
    RedirectToDashboard,
    PassThrough { clear_cookie: bool },
}

/// Login and registration pages, reachable without a session
pub fn is_public_path(path: &str) -> bool {
    path.starts_with(LOGIN_PATH) || path.starts_with(REGISTER_PATH)
}

/// Browser pages the gatekeeper redirects for; JSON API routes are excluded
pub fn is_page_path(path: &str) -> bool {
    !(path == "/api" || path.starts_with("/api/") || path == "/favicon.ico")
}

/// Decide how to route a page request given its session
pub fn decide(path: &str, status: &SessionStatus) -> Decision {
    let public = is_public_path(path);
    match (status, public) {
        (SessionStatus::Missing, false) => Decision::RedirectToLogin {
            clear_cookie: false,
        },
        (SessionStatus::Invalid, false) => Decision::RedirectToLogin { clear_cookie: true },
        (SessionStatus::Invalid, true) => Decision::PassThrough { clear_cookie: true },
        (SessionStatus::Valid(_), true) => Decision::RedirectToDashboard,
        _ => Decision::PassThrough {
            clear_cookie: false,
        },
    }
}

/// Gatekeeper middleware
pub async fn gatekeeper(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();

    if path.starts_with(MOBILE_PREFIX) {
        return cors::handle_mobile(&state.cors, req, next).await;
    }

    if !is_page_path(&path) {
        return next.run(req).await;
    }

    let status = session::resolve(req.headers(), Transport::Cookie, &state.tokens);
    let decision = decide(&path, &status);
    tracing::debug!(path = %path, ?decision, "gatekeeper");

    let (mut response, clear_cookie) = match decision {
        Decision::RedirectToLogin { clear_cookie } => {
            (Redirect::temporary(LOGIN_PATH).into_response(), clear_cookie)
        }
        Decision::RedirectToDashboard => (Redirect::temporary(DASHBOARD_PATH).into_response(), false),
        Decision::PassThrough { clear_cookie } => (next.run(req).await, clear_cookie),
    };

    if clear_cookie {
        response.headers_mut().append(
            header::SET_COOKIE,
            clear_session_cookie(state.config.server.production),
        );
    }

    response
}
