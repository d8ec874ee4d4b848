//! Mobile API
//!
//! Same accounts and documents as the browser API, authenticated with a
//! bearer token and wrapped in a `{success, message, data}` envelope. CORS
//! headers are added by the gatekeeper, not here.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::auth::{authenticate, register_account};
use super::documents::parse_kind;
use super::error::ApiError;
use super::extract::MobileIdentity;
use super::routes::parse_body;
use super::server::SharedState;
use crate::auth::models::{UserProfile, UserSummary};
use crate::auth::session::{self, SessionStatus, Transport};
use crate::store::{Document, NewDocument};

/// Successful mobile response
#[derive(Debug, Serialize)]
pub struct MobileResponse<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> MobileResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message,
            data,
        })
    }
}

/// An [`ApiError`] rendered as `{success: false, message}`
#[derive(Debug)]
pub struct MobileError(pub ApiError);

impl From<ApiError> for MobileError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct MobileErrorBody<'a> {
    success: bool,
    message: &'a str,
}

impl IntoResponse for MobileError {
    fn into_response(self) -> Response {
        let body = MobileErrorBody {
            success: false,
            message: &self.0.message,
        };
        (self.0.status, Json(body)).into_response()
    }
}

type MobileResult<T> = std::result::Result<T, MobileError>;

#[derive(Debug, Serialize)]
pub struct TokenData {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaimsView {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Serialize)]
pub struct VerifyData {
    pub user: UserProfile,
    pub token: TokenClaimsView,
}

#[derive(Debug, Serialize)]
pub struct DocumentsData {
    pub documents: Vec<Document>,
}

#[derive(Debug, Serialize)]
pub struct DocumentData {
    pub document: Document,
}

#[derive(Debug, Deserialize)]
pub struct CreateMobileDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn register(State(state): State<SharedState>, body: Bytes) -> MobileResult<impl IntoResponse> {
    let ttl = state.config.auth.mobile_token_ttl();
    let (user, token) = register_account(&state, &body, ttl).await?;

    Ok((
        StatusCode::CREATED,
        MobileResponse::ok(
            "User created successfully",
            TokenData {
                token,
                user: UserSummary::from(&user),
            },
        ),
    ))
}

pub async fn login(State(state): State<SharedState>, body: Bytes) -> MobileResult<impl IntoResponse> {
    let user = authenticate(&state, &body).await?;

    let token = state
        .tokens
        .issue(&user, state.config.auth.mobile_token_ttl())
        .map_err(|e| ApiError::internal("Login failed. Please try again.", e))?;

    tracing::info!(user_id = %user.id, "Mobile user logged in");
    Ok(MobileResponse::ok(
        "Login successful",
        TokenData {
            token,
            user: UserSummary::from(&user),
        },
    ))
}

/// Check a bearer token and return fresh user data alongside its claims
pub async fn verify(State(state): State<SharedState>, headers: HeaderMap) -> MobileResult<impl IntoResponse> {
    let claims = match session::resolve(&headers, Transport::Bearer, &state.tokens) {
        SessionStatus::Missing => return Err(ApiError::unauthorized("Token is required").into()),
        SessionStatus::Invalid => {
            return Err(ApiError::unauthorized("Invalid or expired token").into())
        }
        SessionStatus::Valid(claims) => claims,
    };

    let user_id = claims
        .user_id()
        .ok_or_else(|| ApiError::validation("Invalid user ID format"))?;

    let user = state
        .store
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| ApiError::storage("Token verification failed", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(MobileResponse::ok(
        "Token is valid",
        VerifyData {
            user: UserProfile::from(&user),
            token: TokenClaimsView {
                user_id: claims.sub,
                email: claims.email,
                name: claims.name,
                exp: claims.exp,
                iat: claims.iat,
            },
        },
    ))
}

pub async fn list_documents(
    State(state): State<SharedState>,
    MobileIdentity(identity): MobileIdentity,
) -> MobileResult<impl IntoResponse> {
    let documents = state
        .store
        .documents
        .list(identity.user_id, None)
        .await
        .map_err(|e| ApiError::storage("Failed to get documents", e))?;

    Ok(MobileResponse::ok(
        "Documents retrieved successfully",
        DocumentsData { documents },
    ))
}

pub async fn create_document(
    State(state): State<SharedState>,
    MobileIdentity(identity): MobileIdentity,
    body: Bytes,
) -> MobileResult<impl IntoResponse> {
    let req: CreateMobileDocumentRequest = parse_body(&body)?;
    let (Some(title), Some(content)) = (
        req.title.filter(|t| !t.trim().is_empty()),
        req.content.filter(|c| !c.is_empty()),
    ) else {
        return Err(ApiError::validation("Title and content are required").into());
    };
    let kind = parse_kind(req.kind.as_deref())?;

    let document = Document::new(
        identity.user_id,
        NewDocument {
            title,
            kind,
            content,
            ..Default::default()
        },
    );
    state
        .store
        .documents
        .insert(&document)
        .await
        .map_err(|e| ApiError::storage("Failed to create document", e))?;

    Ok((
        StatusCode::CREATED,
        MobileResponse::ok("Document created successfully", DocumentData { document }),
    ))
}
