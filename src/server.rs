// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Event listener for the trigger process. One router owns both ingestion
//! paths: registry push notifications on /api/event and GitHub cloud events
//! on /. Handler failures are logged and answered with a 500; the listener
//! keeps serving.

use crate::events::github::{self, github_event_type, is_merged_pull_request, PullRequestPayload};
use crate::events::push::decode_event;
use crate::reconcilers::PipelineRunReconciler;
use crate::template::RenderArgs;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<PipelineRunReconciler>,
}

/// Build the event router. The router is owned by the caller and handed to
/// the server for the lifetime of the process.
pub fn event_router(state: AppState) -> Router {
    Router::new()
        .route("/api/event", post(handle_push_event))
        .route("/", post(handle_cloud_event))
        .with_state(state)
}

async fn handle_push_event(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let event = decode_event(&body);
    info!(
        "push event: repository={} tag={}",
        event.repository.repo_full_name, event.push_data.tag
    );

    let tag = event.push_data.tag;
    let args = RenderArgs {
        image_tag: tag.clone(),
        ..Default::default()
    };

    match state.reconciler.upsert(&args, &tag).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("push event reconcile failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn handle_cloud_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let event_type = headers
        .get("ce-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if event_type == github_event_type("ping") {
        info!("github ping event: {}", String::from_utf8_lossy(&body));
        return StatusCode::OK;
    }

    if event_type != github_event_type("pull_request") {
        info!("ignoring event type: {}", event_type);
        return StatusCode::OK;
    }

    let payload: PullRequestPayload = serde_json::from_slice(&body).unwrap_or_default();
    if !is_merged_pull_request(&payload) {
        info!(
            "pull request, action: {} merged: {} url: {}",
            payload.action, payload.pull_request.merged, payload.pull_request.html_url
        );
        return StatusCode::OK;
    }

    let tag = Utc::now().timestamp().to_string();
    let args = github::render_args(&payload, &tag);

    match state.reconciler.upsert(&args, &tag).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!("pull request reconcile failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
