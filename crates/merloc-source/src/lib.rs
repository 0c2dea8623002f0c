#![forbid(unsafe_code)]

//! Preparing Mermaid source for rendering.
//!
//! - [`sanitize`]: quote node labels the Mermaid parser would reject
//! - [`postprocess`]: clean up diagram text returned by an LLM
//! - [`ink`]: build mermaid.ink image URLs
//! - [`repo`]: collect a repository's file tree and README
//! - [`pipeline`]: the three-step repository → Mermaid completion pipeline

pub mod ink;
pub mod pipeline;
pub mod postprocess;
mod prompts;
pub mod repo;
pub mod sanitize;

pub use ink::{InkImageType, InkOptions, ink_url};
pub use pipeline::{
    Completer, CompletionRequest, DiagramPipeline, PipelineOptions, PipelineOutput, PipelineStep,
    ReasoningEffort,
};
pub use postprocess::{extract_tagged_section, rewrite_click_targets, strip_code_fences};
pub use repo::RepoContext;
pub use sanitize::sanitize_node_labels;

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("no README found in {}", .0.display())]
    MissingReadme(PathBuf),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error("repository context too large: ~{estimated} tokens (limit {limit})")]
    TooLarge { estimated: usize, limit: usize },

    #[error("{step} completion failed: {source}")]
    Completion {
        step: PipelineStep,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("cannot build a file URL for {}", .0.display())]
    InvalidBaseUrl(PathBuf),
}
