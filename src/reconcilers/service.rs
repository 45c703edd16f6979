// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service reconciler - creates a Knative Service for a freshly built image,
//! or rolls an existing one forward to a new pinned revision.

use crate::constants::annotations;
use crate::error::Result;
use crate::types::serving::{
    Container, ContainerPort, RevisionSpec, RevisionTemplateMeta, RevisionTemplateSpec, Service,
    ServiceSpec, TrafficTarget,
};
use chrono::Utc;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{error, info, instrument};

/// One desired serving target, built from the deployer CLI flags.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub image: String,
    pub namespace: String,
    pub service_name: String,
    pub port: String,
}

pub struct ServiceReconciler {
    client: Client,
}

impl ServiceReconciler {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the service by name and either create it or roll it forward.
    /// Any fetch error other than "not found" is surfaced without a write.
    #[instrument(skip(self, req), fields(service = %format!("{}/{}", req.namespace, req.service_name)))]
    pub async fn upsert(&self, req: &DeployRequest) -> Result<()> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), &req.namespace);

        match services.get(&req.service_name).await {
            Ok(existing) => self.update_existing(&services, req, existing).await,
            Err(kube::Error::Api(err)) if err.code == 404 => {
                self.create_new(&services, req).await
            }
            Err(e) => {
                error!(
                    "get service {}/{} failed: {}",
                    req.namespace, req.service_name, e
                );
                Err(e.into())
            }
        }
    }

    async fn create_new(&self, services: &Api<Service>, req: &DeployRequest) -> Result<()> {
        info!(
            "creating service {}/{} with image {}",
            req.namespace, req.service_name, req.image
        );

        let service = Service {
            metadata: ObjectMeta {
                name: Some(req.service_name.clone()),
                namespace: Some(req.namespace.clone()),
                ..Default::default()
            },
            spec: ServiceSpec {
                template: Some(RevisionTemplateSpec {
                    metadata: None,
                    spec: Some(RevisionSpec {
                        containers: vec![Container {
                            name: None,
                            image: Some(req.image.clone()),
                            ports: container_ports(&req.port),
                        }],
                    }),
                }),
                traffic: None,
            },
            status: None,
        };

        if let Err(e) = services.create(&PostParams::default(), &service).await {
            error!(
                "create service {}/{} failed: {}",
                req.namespace, req.service_name, e
            );
            return Err(e.into());
        }

        Ok(())
    }

    async fn update_existing(
        &self,
        services: &Api<Service>,
        req: &DeployRequest,
        mut svc: Service,
    ) -> Result<()> {
        let now = Utc::now().timestamp();
        let revision_name = format!("{}-{}", req.service_name, now);

        info!(
            "updating service {}/{} to image {} as revision {}",
            req.namespace, req.service_name, req.image, revision_name
        );

        let template = svc.spec.template.get_or_insert_with(RevisionTemplateSpec::default);
        let meta = template
            .metadata
            .get_or_insert_with(RevisionTemplateMeta::default);
        // Naming the template after the new revision lets the pinned traffic
        // target below resolve; the refreshed annotation forces a new revision
        // even when the image string is unchanged.
        meta.name = Some(revision_name.clone());
        meta.annotations
            .get_or_insert_with(BTreeMap::new)
            .insert(annotations::UPDATED.to_string(), now.to_string());

        let revision = template.spec.get_or_insert_with(RevisionSpec::default);
        match revision.containers.first_mut() {
            Some(container) => container.image = Some(req.image.clone()),
            None => revision.containers.push(Container {
                name: None,
                image: Some(req.image.clone()),
                ports: container_ports(&req.port),
            }),
        }

        // Rebuild the traffic list from a snapshot of the server-assigned
        // state: URLs cleared, nothing left tracking the latest revision.
        let previous = svc
            .status
            .as_ref()
            .and_then(|s| s.traffic.clone())
            .unwrap_or_default();
        let mut traffic = Vec::with_capacity(previous.len() + 1);
        for mut target in previous {
            target.url = None;
            if target.latest_revision == Some(true) {
                target.latest_revision = Some(false);
            }
            traffic.push(target);
        }
        traffic.push(TrafficTarget {
            revision_name: Some(revision_name),
            tag: Some(format!("test-{}", now)),
            latest_revision: Some(false),
            percent: None,
            url: None,
        });
        svc.spec.traffic = Some(traffic);

        if let Err(e) = services
            .replace(&req.service_name, &PostParams::default(), &svc)
            .await
        {
            error!(
                "update service {}/{} failed: {}",
                req.namespace, req.service_name, e
            );
            return Err(e.into());
        }

        Ok(())
    }
}

fn container_ports(port: &str) -> Option<Vec<ContainerPort>> {
    port.parse::<i32>().ok().map(|p| {
        vec![ContainerPort {
            container_port: Some(p),
        }]
    })
}
