// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! RBAC reconciler - keeps the Role/RoleBinding pair a pipeline's service
//! account needs in sync. Existing objects are overwritten with the desired
//! rules and subjects, not merged.

use crate::constants::SERVING_API_GROUP;
use crate::error::Result;
use k8s_openapi::api::rbac::v1::{PolicyRule, Role, RoleBinding, RoleRef, Subject};
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{error, info, instrument};

const ROLE_VERBS: [&str; 6] = ["get", "list", "create", "watch", "patch", "update"];

/// Reconcile a Role granting serving-service access and a RoleBinding tying
/// it to the given service account, both in the given namespace.
#[instrument(skip(client))]
pub async fn bind_service_role(
    client: &Client,
    name: &str,
    namespace: &str,
    service_account: &str,
) -> Result<()> {
    let desired_rules = vec![PolicyRule {
        api_groups: Some(vec![SERVING_API_GROUP.to_string()]),
        resources: Some(vec!["services".to_string()]),
        verbs: ROLE_VERBS.iter().map(|v| v.to_string()).collect(),
        ..Default::default()
    }];

    let roles: Api<Role> = Api::namespaced(client.clone(), namespace);
    match roles.get(name).await {
        Ok(mut existing) => {
            existing.rules = Some(desired_rules);
            if let Err(e) = roles.replace(name, &PostParams::default(), &existing).await {
                error!("update role {}/{} failed: {}", namespace, name, e);
                return Err(e.into());
            }
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("creating role {}/{}", namespace, name);
            let role = Role {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    ..Default::default()
                },
                rules: Some(desired_rules),
            };
            if let Err(e) = roles.create(&PostParams::default(), &role).await {
                error!("create role {}/{} failed: {}", namespace, name, e);
                return Err(e.into());
            }
        }
        Err(e) => {
            error!("get role {}/{} failed: {}", namespace, name, e);
            return Err(e.into());
        }
    }

    let binding_name = format!("{}-rolebinding", name);
    let desired_subjects = vec![Subject {
        kind: "ServiceAccount".to_string(),
        name: service_account.to_string(),
        namespace: Some(namespace.to_string()),
        ..Default::default()
    }];
    let desired_role_ref = RoleRef {
        api_group: "rbac.authorization.k8s.io".to_string(),
        kind: "Role".to_string(),
        name: name.to_string(),
    };

    let bindings: Api<RoleBinding> = Api::namespaced(client.clone(), namespace);
    match bindings.get(&binding_name).await {
        Ok(mut existing) => {
            existing.subjects = Some(desired_subjects);
            existing.role_ref = desired_role_ref;
            if let Err(e) = bindings
                .replace(&binding_name, &PostParams::default(), &existing)
                .await
            {
                error!(
                    "update rolebinding {}/{} failed: {}",
                    namespace, binding_name, e
                );
                return Err(e.into());
            }
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("creating rolebinding {}/{}", namespace, binding_name);
            let binding = RoleBinding {
                metadata: ObjectMeta {
                    name: Some(binding_name.clone()),
                    namespace: Some(namespace.to_string()),
                    ..Default::default()
                },
                subjects: Some(desired_subjects),
                role_ref: desired_role_ref,
            };
            if let Err(e) = bindings.create(&PostParams::default(), &binding).await {
                error!(
                    "create rolebinding {}/{} failed: {}",
                    namespace, binding_name, e
                );
                return Err(e.into());
            }
        }
        Err(e) => {
            error!(
                "get rolebinding {}/{} failed: {}",
                namespace, binding_name, e
            );
            return Err(e.into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;

    const ROLES_PATH: &str = "/apis/rbac.authorization.k8s.io/v1/namespaces/ci/roles";
    const BINDINGS_PATH: &str = "/apis/rbac.authorization.k8s.io/v1/namespaces/ci/rolebindings";

    fn role_json(name: &str, verbs: &[&str]) -> String {
        serde_json::json!({
            "apiVersion": "rbac.authorization.k8s.io/v1",
            "kind": "Role",
            "metadata": {"name": name, "namespace": "ci", "resourceVersion": "7"},
            "rules": [{
                "apiGroups": ["serving.knative.dev"],
                "resources": ["services"],
                "verbs": verbs
            }]
        })
        .to_string()
    }

    fn binding_json(name: &str) -> String {
        serde_json::json!({
            "apiVersion": "rbac.authorization.k8s.io/v1",
            "kind": "RoleBinding",
            "metadata": {"name": name, "namespace": "ci", "resourceVersion": "7"},
            "subjects": [{"kind": "ServiceAccount", "name": "old-sa", "namespace": "ci"}],
            "roleRef": {"apiGroup": "rbac.authorization.k8s.io", "kind": "Role", "name": "app-build-serving-role"}
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_creates_role_and_binding_when_absent() {
        let mock = MockService::new()
            .on_post(ROLES_PATH, 200, &role_json("app-build-serving-role", &["get"]))
            .on_post(
                BINDINGS_PATH,
                200,
                &binding_json("app-build-serving-role-rolebinding"),
            );

        bind_service_role(
            &mock.clone().into_client(),
            "app-build-serving-role",
            "ci",
            "pipeline-sa",
        )
        .await
        .unwrap();

        let posts = mock.recorded("POST");
        assert_eq!(posts.len(), 2);

        let role: serde_json::Value = serde_json::from_str(&posts[0].body).unwrap();
        assert_eq!(role["metadata"]["name"], "app-build-serving-role");
        assert_eq!(role["rules"][0]["resources"][0], "services");
        assert_eq!(role["rules"][0]["verbs"].as_array().unwrap().len(), 6);

        let binding: serde_json::Value = serde_json::from_str(&posts[1].body).unwrap();
        assert_eq!(
            binding["metadata"]["name"],
            "app-build-serving-role-rolebinding"
        );
        assert_eq!(binding["subjects"][0]["name"], "pipeline-sa");
        assert_eq!(binding["roleRef"]["name"], "app-build-serving-role");
    }

    #[tokio::test]
    async fn test_overwrites_existing_role_and_binding() {
        let mock = MockService::new()
            .on_get(
                &format!("{}/app-build-serving-role", ROLES_PATH),
                200,
                &role_json("app-build-serving-role", &["delete"]),
            )
            .on_put(
                &format!("{}/app-build-serving-role", ROLES_PATH),
                200,
                &role_json("app-build-serving-role", &["get"]),
            )
            .on_get(
                &format!("{}/app-build-serving-role-rolebinding", BINDINGS_PATH),
                200,
                &binding_json("app-build-serving-role-rolebinding"),
            )
            .on_put(
                &format!("{}/app-build-serving-role-rolebinding", BINDINGS_PATH),
                200,
                &binding_json("app-build-serving-role-rolebinding"),
            );

        bind_service_role(
            &mock.clone().into_client(),
            "app-build-serving-role",
            "ci",
            "pipeline-sa",
        )
        .await
        .unwrap();

        assert!(mock.recorded("POST").is_empty());
        let puts = mock.recorded("PUT");
        assert_eq!(puts.len(), 2);

        // Stored rules are replaced wholesale with the desired set.
        let role: serde_json::Value = serde_json::from_str(&puts[0].body).unwrap();
        let verbs = role["rules"][0]["verbs"].as_array().unwrap();
        assert_eq!(verbs.len(), 6);
        assert!(verbs.iter().any(|v| v == "watch"));
        assert!(!verbs.iter().any(|v| v == "delete"));

        // Subjects converge to the declared service account.
        let binding: serde_json::Value = serde_json::from_str(&puts[1].body).unwrap();
        assert_eq!(binding["subjects"][0]["name"], "pipeline-sa");
        assert_eq!(binding["subjects"].as_array().unwrap().len(), 1);
    }
}
