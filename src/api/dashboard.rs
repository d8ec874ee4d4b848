//! Dashboard summary

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use super::error::{ApiError, ApiResult};
use super::extract::WebIdentity;
use super::server::{AppState, SharedState};
use crate::store::{Document, Link};

/// How many recent items of each kind the summary carries
pub const RECENT_LIMIT: i64 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_documents: i64,
    pub total_links: i64,
    pub recent_documents: Vec<Document>,
    pub recent_links: Vec<Link>,
}

/// Counts and the most recent items for one owner
pub(crate) async fn load_summary(state: &AppState, owner: Uuid) -> ApiResult<DashboardSummary> {
    let reason = "Failed to load dashboard";
    let store = &state.store;

    let total_documents = store
        .documents
        .count(owner)
        .await
        .map_err(|e| ApiError::storage(reason, e))?;
    let total_links = store
        .links
        .count(owner)
        .await
        .map_err(|e| ApiError::storage(reason, e))?;
    let recent_documents = store
        .documents
        .list(owner, Some(RECENT_LIMIT))
        .await
        .map_err(|e| ApiError::storage(reason, e))?;
    let recent_links = store
        .links
        .list(owner, Some(RECENT_LIMIT))
        .await
        .map_err(|e| ApiError::storage(reason, e))?;

    Ok(DashboardSummary {
        total_documents,
        total_links,
        recent_documents,
        recent_links,
    })
}

pub async fn summary(
    State(state): State<SharedState>,
    WebIdentity(identity): WebIdentity,
) -> ApiResult<Json<DashboardSummary>> {
    load_summary(&state, identity.user_id).await.map(Json)
}
