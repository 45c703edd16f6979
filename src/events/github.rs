// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! GitHub pull-request cloud events. Only a merged pull request deploys;
//! every other action is logged and dropped.

use crate::constants::GITHUB_EVENT_TYPE_PREFIX;
use crate::template::RenderArgs;
use chrono::Utc;
use serde::Deserialize;

/// Cloud-event type string for a GitHub event name
pub fn github_event_type(event: &str) -> String {
    format!("{}.{}", GITHUB_EVENT_TYPE_PREFIX, event)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub merged: bool,
    #[serde(default)]
    pub merge_commit_sha: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub base: Base,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Base {
    #[serde(default, rename = "ref")]
    pub branch: String,
}

/// A pull request only deploys once it is closed by merging.
pub fn is_merged_pull_request(payload: &PullRequestPayload) -> bool {
    payload.action == "closed" && payload.pull_request.merged
}

/// Build template args from the merged pull request.
pub fn render_args(payload: &PullRequestPayload, image_tag: &str) -> RenderArgs {
    let commit_id = payload
        .pull_request
        .merge_commit_sha
        .clone()
        .unwrap_or_default();
    let short_commit_id = commit_id.get(..8).unwrap_or(commit_id.as_str()).to_string();

    RenderArgs {
        commit_id,
        short_commit_id,
        branch: payload.pull_request.base.branch.clone(),
        timestamp: Utc::now().format("%Y%m%d%H%M%S").to_string(),
        image_tag: image_tag.to_string(),
    }
}
