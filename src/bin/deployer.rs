// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use kube::Client;
use tracing::info;

use gantry::config::DeployerOptions;
use gantry::reconcilers::{DeployRequest, ServiceReconciler};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let options = DeployerOptions::parse();
    let request = DeployRequest {
        image: options.image,
        namespace: options.namespace,
        service_name: options.service_name,
        port: options.port,
    };

    info!(
        "starting deploy of {} to {}/{}",
        request.image, request.namespace, request.service_name
    );

    let client = Client::try_default().await?;
    ServiceReconciler::new(client).upsert(&request).await?;

    info!(
        "deploy of {}/{} complete",
        request.namespace, request.service_name
    );
    Ok(())
}
