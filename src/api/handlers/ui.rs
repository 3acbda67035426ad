//! Snapshot, search and action handlers

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::automation::{Action, ActionOutcome, Criterion, ElementInfo, IdleOutcome, ResolvedElement};
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    /// Include structural containers
    #[serde(default)]
    pub detail: bool,
}

/// Render the current screen as tab-separated text
pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
) -> Result<impl IntoResponse> {
    let snapshot = state.manager.snapshot(query.detail).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::HeaderName::from_static("x-snapshot-id"),
                snapshot.snapshot_id,
            ),
        ],
        snapshot.text,
    ))
}

#[derive(Debug, Deserialize)]
pub struct FindRequest {
    pub criterion: Criterion,
    pub value: String,
    #[serde(default)]
    pub exact: bool,
}

#[derive(Debug, Serialize)]
pub struct FindResponse {
    pub count: usize,
    pub elements: Vec<ElementInfo>,
}

pub async fn find_elements(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FindRequest>,
) -> Result<Json<FindResponse>> {
    let elements = state
        .manager
        .find(request.criterion, &request.value, request.exact)
        .await?;
    Ok(Json(FindResponse {
        count: elements.len(),
        elements,
    }))
}

/// Resolve a node id against the latest snapshot
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedElement>> {
    Ok(Json(state.manager.resolve(&id).await?))
}

pub async fn perform_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<Action>,
) -> Result<Json<ActionOutcome>> {
    tracing::info!("Action requested: {}", action.name());
    Ok(Json(state.manager.perform(&action).await?))
}

#[derive(Debug, Deserialize)]
pub struct WaitForIdleRequest {
    #[serde(default = "default_idle_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u32,
}

fn default_idle_timeout() -> u64 {
    5_000
}

fn default_poll_interval() -> u64 {
    250
}

fn default_similarity_threshold() -> u32 {
    95
}

pub async fn wait_for_idle(
    State(state): State<Arc<AppState>>,
    Json(request): Json<WaitForIdleRequest>,
) -> Result<Json<IdleOutcome>> {
    let outcome = state
        .manager
        .wait_for_idle(
            request.timeout_ms,
            request.poll_interval_ms,
            request.similarity_threshold,
        )
        .await?;
    Ok(Json(outcome))
}
