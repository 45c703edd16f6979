// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! API object types for the serving and pipeline resources the tools manage.

pub mod pipeline;
pub mod serving;
