// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use clap::Parser;
use std::path::PathBuf;

/// Flags for the one-shot deployer CLI
#[derive(Debug, Parser)]
#[command(name = "deployer", about = "Points a Knative Service at a newly built image")]
pub struct DeployerOptions {
    /// Container image to deploy
    #[arg(long)]
    pub image: String,

    /// Namespace of the Knative Service
    #[arg(long, env = "NAMESPACE")]
    pub namespace: String,

    /// Knative service name (flag spelling kept for existing callers)
    #[arg(long = "serivce-name")]
    pub service_name: String,

    /// Container port exposed by the image
    #[arg(long, default_value = "8080")]
    pub port: String,
}

/// Flags for the long-lived event listener
#[derive(Debug, Parser)]
#[command(name = "trigger", about = "Turns registry and GitHub events into pipeline runs")]
pub struct TriggerOptions {
    /// Path to the pipeline-run template
    #[arg(long = "trigger-config")]
    pub trigger_config: PathBuf,

    /// Port the event listener binds to
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deployer_options_port_default() {
        let options = DeployerOptions::try_parse_from([
            "deployer",
            "--image",
            "repo/app:v2",
            "--namespace",
            "default",
            "--serivce-name",
            "app",
        ])
        .unwrap();

        assert_eq!(options.port, "8080");
        assert_eq!(options.image, "repo/app:v2");
        assert_eq!(options.service_name, "app");
    }

    #[test]
    fn test_deployer_options_image_required() {
        let result = DeployerOptions::try_parse_from([
            "deployer",
            "--namespace",
            "default",
            "--serivce-name",
            "app",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_trigger_options_port_default() {
        let options =
            TriggerOptions::try_parse_from(["trigger", "--trigger-config", "/etc/gantry/run.yaml"])
                .unwrap();
        assert_eq!(options.port, 8080);
        assert_eq!(options.trigger_config, PathBuf::from("/etc/gantry/run.yaml"));
    }

    #[test]
    fn test_trigger_options_config_required() {
        assert!(TriggerOptions::try_parse_from(["trigger"]).is_err());
    }
}
