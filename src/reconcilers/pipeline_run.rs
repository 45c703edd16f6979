// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! PipelineRun reconciler - renders the configured template into a pipeline
//! run, keeps its RBAC in place, and resubmits it to the workflow engine.
//! Runs cannot be mutated in place, so an existing run of the same name is
//! deleted before the new one is created.

use crate::constants::DEFAULT_NAMESPACE;
use crate::error::Result;
use crate::reconcilers::rbac::bind_service_role;
use crate::template::{PipelineTemplate, RenderArgs};
use crate::types::pipeline::{Param, PipelineRun};
use kube::{
    api::{DeleteParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{error, info, instrument};

pub struct PipelineRunReconciler {
    client: Client,
    template: PipelineTemplate,
}

impl PipelineRunReconciler {
    pub fn new(client: Client, template: PipelineTemplate) -> Self {
        Self { client, template }
    }

    /// Render the template, rewrite the image tag param, reconcile RBAC and
    /// submit the run. RBAC objects already reconciled stay in place when a
    /// later step fails; the next event converges them again.
    #[instrument(skip(self, args))]
    pub async fn upsert(&self, args: &RenderArgs, image_tag: &str) -> Result<()> {
        let mut run = self.template.render(args)?;

        let namespace = run
            .metadata
            .namespace
            .get_or_insert_with(|| DEFAULT_NAMESPACE.to_string())
            .clone();
        run.spec.params = rewrite_image_tag(run.spec.params, image_tag);

        let name = run.name_any();
        let service_account = run.spec.service_account.clone().unwrap_or_default();
        let role_name = format!("{}-serving-role", name);
        bind_service_role(&self.client, &role_name, &namespace, &service_account).await?;

        let runs: Api<PipelineRun> = Api::namespaced(self.client.clone(), &namespace);
        match runs.get(&name).await {
            Ok(_) => {
                info!("pipeline run {}/{} exists, deleting", namespace, name);
                match runs.delete(&name, &DeleteParams::default()).await {
                    Ok(_) => {}
                    // Already gone; someone else won the race to delete it.
                    Err(kube::Error::Api(err)) if err.code == 404 => {}
                    Err(e) => {
                        error!("delete pipeline run {}/{} failed: {}", namespace, name, e);
                        return Err(e.into());
                    }
                }
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {}
            Err(e) => {
                error!("get pipeline run {}/{} failed: {}", namespace, name, e);
                return Err(e.into());
            }
        }

        info!(
            "creating pipeline run {}/{} with image tag {}",
            namespace, name, image_tag
        );
        if let Err(e) = runs.create(&PostParams::default(), &run).await {
            error!("create pipeline run {}/{} failed: {}", namespace, name, e);
            return Err(e.into());
        }

        Ok(())
    }
}

/// Replace the value of the `imageTag` param with the event-derived tag,
/// leaving every other param untouched and in order.
fn rewrite_image_tag(params: Vec<Param>, tag: &str) -> Vec<Param> {
    params
        .into_iter()
        .map(|param| {
            if param.name == "imageTag" {
                Param {
                    value: tag.to_string(),
                    ..param
                }
            } else {
                param
            }
        })
        .collect()
}
