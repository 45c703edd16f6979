// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use kube::Client;
use std::sync::Arc;
use tracing::info;

use gantry::config::TriggerOptions;
use gantry::reconcilers::PipelineRunReconciler;
use gantry::server::{event_router, AppState};
use gantry::template::PipelineTemplate;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let options = TriggerOptions::parse();
    info!(
        "starting trigger with template {}",
        options.trigger_config.display()
    );

    let client = Client::try_default().await?;
    let template = PipelineTemplate::new(&options.trigger_config);
    let reconciler = Arc::new(PipelineRunReconciler::new(client, template));

    let app = event_router(AppState { reconciler });

    let addr = format!("0.0.0.0:{}", options.port);
    info!("event listener on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
