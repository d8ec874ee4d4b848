//! Document endpoints, scoped to the cookie session's user

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::extract::WebIdentity;
use super::routes::{parse_body, MessageResponse};
use super::server::SharedState;
use crate::store::{Document, DocumentKind, NewDocument};

const NOT_FOUND: &str = "Document not found";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub link: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Parse an optional `type` field, rejecting anything but the known kinds
pub(crate) fn parse_kind(kind: Option<&str>) -> ApiResult<Option<DocumentKind>> {
    kind.map(|k| k.parse::<DocumentKind>())
        .transpose()
        .map_err(|_| ApiError::validation("Invalid document type"))
}

/// Path ids that are not UUIDs cannot name any record
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(not_found))
}

pub async fn list_documents(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
) -> ApiResult<Json<Vec<Document>>> {
    let documents = state
        .store
        .documents
        .list(identity.user_id, None)
        .await
        .map_err(|e| ApiError::storage("Failed to get documents", e))?;

    Ok(Json(documents))
}

pub async fn create_document(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let req: CreateDocumentRequest = parse_body(&body)?;
    let (Some(title), Some(content)) = (
        req.title.filter(|t| !t.trim().is_empty()),
        req.content.filter(|c| !c.is_empty()),
    ) else {
        return Err(ApiError::validation("Title and content are required"));
    };
    let kind = parse_kind(req.kind.as_deref())?;

    let document = Document::new(
        identity.user_id,
        NewDocument {
            title,
            kind,
            content,
            file_url: req.file_url,
            file_type: req.file_type,
            file_size: req.file_size,
            link: req.link,
            tags: req.tags,
        },
    );
    state
        .store
        .documents
        .insert(&document)
        .await
        .map_err(|e| ApiError::storage("Failed to create document", e))?;

    tracing::debug!(document_id = %document.id, "Created document");
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn get_document(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    Path(id): Path<String>,
) -> ApiResult<Json<Document>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let document = state
        .store
        .documents
        .get(identity.user_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to get document", e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Json(document))
}

pub async fn delete_document(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    let deleted = state
        .store
        .documents
        .delete(identity.user_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete document", e))?;

    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(MessageResponse::new("Document deleted successfully"))
}
