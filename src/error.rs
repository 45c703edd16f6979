// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GantryError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to render pipeline template: {0}")]
    TemplateError(String),

    #[error("Failed to parse rendered pipeline run: {0}")]
    ParseError(String),
}

pub type Result<T> = std::result::Result<T, GantryError>;
