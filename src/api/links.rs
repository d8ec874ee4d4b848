//! Bookmarked link endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::documents::parse_id;
use super::error::{ApiError, ApiResult};
use super::extract::WebIdentity;
use super::routes::{parse_body, MessageResponse};
use super::server::SharedState;
use crate::store::{Link, LinkUpdate, NewLink};

const NOT_FOUND: &str = "Link not found";

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl LinkRequest {
    fn required(&self) -> ApiResult<(String, String)> {
        match (non_blank(&self.title), non_blank(&self.url)) {
            (Some(title), Some(url)) => Ok((title, url)),
            _ => Err(ApiError::validation("Title and URL are required")),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub link: Link,
}

#[derive(Debug, Serialize)]
pub struct LinkCreatedResponse {
    pub message: &'static str,
    pub link: Link,
}

pub async fn list_links(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
) -> ApiResult<Json<LinkListResponse>> {
    let links = state
        .store
        .links
        .list(identity.user_id, None)
        .await
        .map_err(|e| ApiError::storage("Failed to get links", e))?;

    Ok(Json(LinkListResponse { links }))
}

pub async fn create_link(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let req: LinkRequest = parse_body(&body)?;
    let (title, url) = req.required()?;

    let link = Link::new(
        identity.user_id,
        NewLink {
            title,
            url,
            description: req.description,
            category: req.category,
        },
    );
    state
        .store
        .links
        .insert(&link)
        .await
        .map_err(|e| ApiError::storage("Failed to create link", e))?;

    Ok((
        StatusCode::CREATED,
        Json(LinkCreatedResponse {
            message: "Link created successfully",
            link,
        }),
    ))
}

pub async fn get_link(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    Path(id): Path<String>,
) -> ApiResult<Json<LinkResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let link = state
        .store
        .links
        .get(identity.user_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to get link", e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Json(LinkResponse { link }))
}

pub async fn update_link(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<LinkResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let req: LinkRequest = parse_body(&body)?;
    let (title, url) = req.required()?;

    let link = state
        .store
        .links
        .update(identity.user_id, id, &LinkUpdate { title, url })
        .await
        .map_err(|e| ApiError::storage("Failed to update link", e))?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Json(LinkResponse { link }))
}

pub async fn delete_link(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id, NOT_FOUND)?;
    let deleted = state
        .store
        .links
        .delete(identity.user_id, id)
        .await
        .map_err(|e| ApiError::storage("Failed to delete link", e))?;

    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    Ok(MessageResponse::new("Link deleted successfully"))
}
