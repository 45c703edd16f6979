// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Registry push notifications posted to the event endpoint.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventInfo {
    #[serde(default)]
    pub push_data: PushData,
    #[serde(default)]
    pub repository: Repository,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushData {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub repo_full_name: String,
}

/// Best-effort decode: a malformed body yields an event with empty fields
/// rather than a rejection, and the reconcile attempt still happens.
pub fn decode_event(body: &[u8]) -> EventInfo {
    serde_json::from_slice(body).unwrap_or_default()
}
