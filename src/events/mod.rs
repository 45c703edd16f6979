// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Inbound event payloads and the filters that decide which ones deploy.

pub mod github;
pub mod push;

pub use github::{github_event_type, is_merged_pull_request, PullRequestPayload};
pub use push::{decode_event, EventInfo};
