// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pipeline-run template loading and rendering.

use crate::error::{GantryError, Result};
use crate::types::pipeline::PipelineRun;
use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Values an inbound event contributes to the template. Pull-request events
/// fill the commit fields, registry pushes fill `imageTag`; unused fields
/// render as empty strings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderArgs {
    pub commit_id: String,
    pub short_commit_id: String,
    pub branch: String,
    pub timestamp: String,
    pub image_tag: String,
}

/// A pipeline-run template file. The file is re-read on every render so a
/// mounted config update takes effect without a restart.
#[derive(Debug, Clone)]
pub struct PipelineTemplate {
    path: PathBuf,
}

impl PipelineTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Render the template with the given args and decode the resulting YAML
    /// document into a pipeline run.
    pub fn render(&self, args: &RenderArgs) -> Result<PipelineRun> {
        let source = fs::read_to_string(&self.path).map_err(|e| {
            GantryError::TemplateError(format!("read {}: {}", self.path.display(), e))
        })?;

        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        let rendered = registry
            .render_template(&source, args)
            .map_err(|e| GantryError::TemplateError(e.to_string()))?;

        serde_yaml::from_str(&rendered).map_err(|e| GantryError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TEMPLATE: &str = r#"
apiVersion: tekton.dev/v1alpha1
kind: PipelineRun
metadata:
  name: app-build-{{timestamp}}
spec:
  serviceAccount: pipeline-sa
  pipelineRef:
    name: build-and-deploy
  params:
    - name: revision
      value: "{{commitId}}"
    - name: branch
      value: "{{branch}}"
    - name: imageTag
      value: "{{imageTag}}"
"#;

    fn write_template(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn make_args() -> RenderArgs {
        RenderArgs {
            commit_id: "0123456789abcdef".to_string(),
            short_commit_id: "01234567".to_string(),
            branch: "main".to_string(),
            timestamp: "20260806120000".to_string(),
            image_tag: "v3".to_string(),
        }
    }

    #[test]
    fn test_render_substitutes_args() {
        let file = write_template(TEMPLATE);
        let template = PipelineTemplate::new(file.path());

        let run = template.render(&make_args()).unwrap();

        assert_eq!(run.metadata.name.as_deref(), Some("app-build-20260806120000"));
        assert_eq!(run.spec.params[0].value, "0123456789abcdef");
        assert_eq!(run.spec.params[1].value, "main");
        assert_eq!(run.spec.params[2].value, "v3");
    }

    #[test]
    fn test_render_leaves_branch_slashes_unescaped() {
        let file = write_template(TEMPLATE);
        let template = PipelineTemplate::new(file.path());

        let mut args = make_args();
        args.branch = "feature/login".to_string();

        let run = template.render(&args).unwrap();
        assert_eq!(run.spec.params[1].value, "feature/login");
    }

    #[test]
    fn test_render_missing_file_is_error() {
        let template = PipelineTemplate::new("/nonexistent/run.yaml");
        assert!(template.render(&make_args()).is_err());
    }

    #[test]
    fn test_render_invalid_yaml_is_error() {
        let file = write_template("spec: [unclosed");
        let template = PipelineTemplate::new(file.path());
        assert!(template.render(&make_args()).is_err());
    }
}
