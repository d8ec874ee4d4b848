//! Session resolution for both credential transports

use axum::http::{header, HeaderMap, HeaderValue};

use crate::auth::jwt::{Claims, TokenIssuer};

/// Name of the browser session cookie
pub const SESSION_COOKIE: &str = "token";

/// Where a request carries its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `token` cookie, used by the browser app
    Cookie,
    /// `Authorization: Bearer <token>`, used by the mobile API
    Bearer,
}

/// Outcome of resolving a request's credential
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    /// No credential was presented
    Missing,
    /// Credential verified
    Valid(Claims),
    /// Credential present but bad signature, malformed, or expired
    Invalid,
}

impl SessionStatus {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            SessionStatus::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, SessionStatus::Valid(_))
    }
}

/// Pull the raw token out of the headers for the given transport
pub fn credential(headers: &HeaderMap, transport: Transport) -> Option<&str> {
    match transport {
        Transport::Bearer => headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty()),
        Transport::Cookie => headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty()),
    }
}

/// Resolve the request's credential to an identity.
///
/// Depends only on the headers and the issuer; safe to call any number of
/// times per request.
pub fn resolve(headers: &HeaderMap, transport: Transport, issuer: &TokenIssuer) -> SessionStatus {
    let Some(token) = credential(headers, transport) else {
        return SessionStatus::Missing;
    };

    match issuer.verify(token) {
        Ok(claims) => SessionStatus::Valid(claims),
        Err(e) => {
            tracing::debug!("Rejected {:?} credential: {}", transport, e);
            SessionStatus::Invalid
        }
    }
}

/// Build the `Set-Cookie` value carrying a session token
pub fn session_cookie(token: &str, max_age: chrono::Duration, secure: bool) -> HeaderValue {
    build_cookie(token, max_age.num_seconds(), secure)
}

/// Build the `Set-Cookie` value that deletes the session cookie
pub fn clear_session_cookie(secure: bool) -> HeaderValue {
    build_cookie("", 0, secure)
}

fn build_cookie(value: &str, max_age: i64, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, value, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
        .expect("Invalid cookie characters - this is a bug in the codebase")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::User;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("session-test-secret").unwrap()
    }

    fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_credential() {
        let h = headers(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(credential(&h, Transport::Bearer), Some("abc.def.ghi"));
        assert_eq!(credential(&h, Transport::Cookie), None);
    }

    #[test]
    fn test_bearer_requires_scheme() {
        let h = headers(header::AUTHORIZATION, "Basic abc");
        assert_eq!(credential(&h, Transport::Bearer), None);
    }

    #[test]
    fn test_cookie_credential_among_others() {
        let h = headers(header::COOKIE, "theme=dark; token=abc.def.ghi; other=1");
        assert_eq!(credential(&h, Transport::Cookie), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let h = headers(header::COOKIE, "xtoken=abc");
        assert_eq!(credential(&h, Transport::Cookie), None);
    }

    #[test]
    fn test_resolve_missing() {
        assert_eq!(
            resolve(&HeaderMap::new(), Transport::Cookie, &issuer()),
            SessionStatus::Missing
        );
    }

    #[test]
    fn test_resolve_valid_and_invalid() {
        let user = User::new("Al".into(), "a@b.com".into(), String::new());
        let token = issuer().issue(&user, chrono::Duration::days(7)).unwrap();

        let good = headers(header::COOKIE, &format!("token={}", token));
        let status = resolve(&good, Transport::Cookie, &issuer());
        assert_eq!(status.claims().map(|c| c.email.as_str()), Some("a@b.com"));

        let bad = headers(header::COOKIE, "token=garbage");
        assert_eq!(resolve(&bad, Transport::Cookie, &issuer()), SessionStatus::Invalid);
    }

    #[test]
    fn test_resolve_expired_is_invalid() {
        let user = User::new("Al".into(), "a@b.com".into(), String::new());
        let token = issuer()
            .issue_at(&user, chrono::Duration::seconds(60), 1_000)
            .unwrap();
        let h = headers(header::AUTHORIZATION, &format!("Bearer {}", token));
        assert_eq!(resolve(&h, Transport::Bearer, &issuer()), SessionStatus::Invalid);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", chrono::Duration::days(7), false);
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("token=abc;"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        let secure = session_cookie("abc", chrono::Duration::days(7), true);
        assert!(secure.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn test_issued_token_fits_in_cookie() {
        let user = User::new("Al".into(), "a@b.com".into(), String::new());
        let token = issuer().issue(&user, chrono::Duration::days(7)).unwrap();
        let cookie = session_cookie(&token, chrono::Duration::days(7), true);
        let expected = format!(
            "token={}; Path=/; Max-Age=604800; HttpOnly; SameSite=Lax; Secure",
            token
        );
        assert_eq!(cookie.to_str().unwrap(), expected);
    }

    #[test]
    fn test_clear_cookie() {
        let cookie = clear_session_cookie(false);
        assert!(cookie.to_str().unwrap().starts_with("token=; Path=/; Max-Age=0"));
    }
}
