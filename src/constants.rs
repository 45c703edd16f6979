// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Annotation keys stamped onto managed objects
pub mod annotations {
    /// Unix timestamp of the last deploy, refreshed on every update so the
    /// platform cuts a new revision even for an unchanged image string
    pub const UPDATED: &str = "updated";
}

/// Namespace used when a rendered pipeline run does not declare one
pub const DEFAULT_NAMESPACE: &str = "default";

/// API group the pipeline's service account needs access to
pub const SERVING_API_GROUP: &str = "serving.knative.dev";

/// Prefix all GitHub event types carry when converted to cloud events
pub const GITHUB_EVENT_TYPE_PREFIX: &str = "dev.knative.source.github";
