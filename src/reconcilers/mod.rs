// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Create-or-update reconciliation against the cluster API.

pub mod pipeline_run;
pub mod rbac;
pub mod service;

pub use pipeline_run::PipelineRunReconciler;
pub use rbac::bind_service_role;
pub use service::{DeployRequest, ServiceReconciler};
