//! Repository → Mermaid diagram through three chat completions:
//! explanation, component mapping, then diagram code.
//!
//! The model backend sits behind [`Completer`]; this module only builds prompts and post-processes
//! the answers.

use crate::postprocess::{extract_tagged_section, rewrite_click_targets, strip_code_fences};
use crate::prompts::{COMPONENT_MAPPING_PROMPT, DIAGRAM_PROMPT, EXPLANATION_PROMPT};
use crate::repo::RepoContext;
use crate::sanitize::sanitize_node_labels;
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "o4-mini";
pub const DEFAULT_TOKEN_LIMIT: usize = 195_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Explanation,
    ComponentMapping,
    Diagram,
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Explanation => "explanation",
            Self::ComponentMapping => "component mapping",
            Self::Diagram => "diagram",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub step: PipelineStep,
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_message: String,
    pub reasoning_effort: Option<ReasoningEffort>,
}

/// A chat-completion backend.
pub trait Completer {
    fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

impl<C: Completer + ?Sized> Completer for &C {
    fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> std::result::Result<String, Box<dyn std::error::Error + Send + Sync>> {
        (**self).complete(request)
    }
}

/// Formats named inputs as `<key>\nvalue\n</key>` blocks separated by newlines.
pub fn format_user_message(data: &[(&str, &str)]) -> String {
    data.iter()
        .map(|(key, value)| format!("<{key}>\n{value}\n</{key}>"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub model: String,
    pub token_limit: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            token_limit: DEFAULT_TOKEN_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub mermaid: String,
    pub explanation: String,
    pub component_mapping: String,
}

pub struct DiagramPipeline<C> {
    completer: C,
    options: PipelineOptions,
}

impl<C: Completer> DiagramPipeline<C> {
    pub fn new(completer: C, options: PipelineOptions) -> Self {
        Self { completer, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Collects the repository context of `dir` and runs all three steps. Click targets in the
    /// diagram are resolved against the directory's `file://` URL.
    pub fn run(&self, dir: &Path) -> Result<PipelineOutput> {
        let dir = std::fs::canonicalize(dir).map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let context = RepoContext::collect(&dir)?;
        let base_url = url::Url::from_directory_path(&dir)
            .map_err(|()| Error::InvalidBaseUrl(dir.clone()))?;
        self.run_with_context(&context, base_url.as_str())
    }

    pub fn run_with_context(&self, context: &RepoContext, base_url: &str) -> Result<PipelineOutput> {
        let estimated = context.estimated_tokens();
        if estimated > self.options.token_limit {
            return Err(Error::TooLarge {
                estimated,
                limit: self.options.token_limit,
            });
        }

        let explanation = self.complete(
            PipelineStep::Explanation,
            EXPLANATION_PROMPT,
            &[
                ("file_tree", context.file_tree.as_str()),
                ("readme", context.readme.as_str()),
            ],
            ReasoningEffort::Medium,
        )?;

        let mapping_answer = self.complete(
            PipelineStep::ComponentMapping,
            COMPONENT_MAPPING_PROMPT,
            &[
                ("explanation", explanation.as_str()),
                ("file_tree", context.file_tree.as_str()),
            ],
            ReasoningEffort::Low,
        )?;
        let component_mapping =
            extract_tagged_section(&mapping_answer, "component_mapping").to_string();

        let diagram = self.complete(
            PipelineStep::Diagram,
            DIAGRAM_PROMPT,
            &[
                ("explanation", explanation.as_str()),
                ("component_mapping", component_mapping.as_str()),
            ],
            ReasoningEffort::Low,
        )?;
        let mermaid = strip_code_fences(&diagram);
        let mermaid = rewrite_click_targets(&mermaid, base_url);
        let mermaid = sanitize_node_labels(&mermaid);

        Ok(PipelineOutput {
            mermaid,
            explanation,
            component_mapping,
        })
    }

    fn complete(
        &self,
        step: PipelineStep,
        system_prompt: &str,
        data: &[(&str, &str)],
        reasoning_effort: ReasoningEffort,
    ) -> Result<String> {
        let request = CompletionRequest {
            step,
            model: &self.options.model,
            system_prompt,
            user_message: format_user_message(data),
            reasoning_effort: Some(reasoning_effort),
        };
        tracing::debug!(%step, model = %self.options.model, "requesting completion");
        self.completer
            .complete(&request)
            .map_err(|source| Error::Completion { step, source })
    }
}
