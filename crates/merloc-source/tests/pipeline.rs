use merloc_source::pipeline::format_user_message;
use merloc_source::{
    Completer, CompletionRequest, DiagramPipeline, Error, PipelineOptions, PipelineStep,
    ReasoningEffort,
};
use std::cell::RefCell;
use std::fs;

#[derive(Debug, Clone)]
struct Recorded {
    step: PipelineStep,
    model: String,
    user_message: String,
    reasoning_effort: Option<ReasoningEffort>,
}

/// Replays canned answers in order and records every request.
struct ScriptedCompleter {
    answers: Vec<Result<&'static str, &'static str>>,
    seen: RefCell<Vec<Recorded>>,
}

impl ScriptedCompleter {
    fn new(answers: Vec<Result<&'static str, &'static str>>) -> Self {
        Self {
            answers,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Completer for ScriptedCompleter {
    fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let mut seen = self.seen.borrow_mut();
        let answer = self.answers[seen.len()];
        seen.push(Recorded {
            step: request.step,
            model: request.model.to_string(),
            user_message: request.user_message.clone(),
            reasoning_effort: request.reasoning_effort,
        });
        answer.map(str::to_string).map_err(Into::into)
    }
}

const EXPLANATION: &str = "<explanation>A web service with an API and a database.</explanation>";
const MAPPING: &str =
    "Here is the mapping:\n<component_mapping>\n1. API: src/api\n</component_mapping>\nDone.";
const DIAGRAM: &str =
    "```mermaid\nflowchart TD\n  A[API (axum)] --> B[Db]\n  click A \"src/api\"\n```\n";

fn sample_repo() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(tmp.path().join("src/api")).expect("mkdir");
    fs::write(tmp.path().join("src/api/mod.rs"), "").expect("write");
    fs::write(tmp.path().join("README.md"), "# Orders\nAn order service.").expect("write");
    tmp
}

#[test]
fn pipeline_runs_three_steps_and_cleans_the_diagram() {
    let repo = sample_repo();
    let completer = ScriptedCompleter::new(vec![Ok(EXPLANATION), Ok(MAPPING), Ok(DIAGRAM)]);
    let pipeline = DiagramPipeline::new(&completer, PipelineOptions::default());

    let out = pipeline.run(repo.path()).expect("pipeline ok");

    let root = fs::canonicalize(repo.path()).expect("canonical");
    let base = url::Url::from_directory_path(&root).expect("file url");
    let base = base.as_str().trim_end_matches('/');
    assert_eq!(
        out.mermaid,
        format!("flowchart TD\n  A[\"API (axum)\"] --> B[Db]\n  click A \"{base}/src/api\"")
    );
    assert_eq!(out.explanation, EXPLANATION);
    assert_eq!(
        out.component_mapping,
        "<component_mapping>\n1. API: src/api\n</component_mapping>"
    );

    let seen = completer.seen.borrow();
    let steps: Vec<_> = seen.iter().map(|r| (r.step, r.reasoning_effort)).collect();
    assert_eq!(
        steps,
        vec![
            (PipelineStep::Explanation, Some(ReasoningEffort::Medium)),
            (PipelineStep::ComponentMapping, Some(ReasoningEffort::Low)),
            (PipelineStep::Diagram, Some(ReasoningEffort::Low)),
        ]
    );
    assert!(seen.iter().all(|r| r.model == "o4-mini"));
    assert_eq!(
        seen[0].user_message,
        format_user_message(&[
            ("file_tree", "README.md\nsrc\nsrc/api\nsrc/api/mod.rs"),
            ("readme", "# Orders\nAn order service."),
        ])
    );
    assert!(seen[2].user_message.contains("<component_mapping>\n<component_mapping>"));
}

#[test]
fn oversized_context_is_rejected_before_any_completion() {
    let repo = sample_repo();
    let completer = ScriptedCompleter::new(vec![]);
    let options = PipelineOptions {
        token_limit: 1,
        ..Default::default()
    };
    let err = DiagramPipeline::new(&completer, options)
        .run(repo.path())
        .expect_err("too large");
    assert!(matches!(err, Error::TooLarge { limit: 1, .. }), "{err}");
    assert!(completer.seen.borrow().is_empty());
}

#[test]
fn completion_failures_name_the_failing_step() {
    let repo = sample_repo();
    let completer = ScriptedCompleter::new(vec![Ok(EXPLANATION), Err("rate limited")]);
    let err = DiagramPipeline::new(&completer, PipelineOptions::default())
        .run(repo.path())
        .expect_err("completion error");
    assert!(
        matches!(
            err,
            Error::Completion {
                step: PipelineStep::ComponentMapping,
                ..
            }
        ),
        "{err}"
    );
    assert_eq!(err.to_string(), "component mapping completion failed: rate limited");
    assert_eq!(completer.seen.borrow().len(), 2);
}

#[test]
fn user_message_wraps_each_input_in_tags() {
    assert_eq!(
        format_user_message(&[("a", "one"), ("b", "two")]),
        "<a>\none\n</a>\n<b>\ntwo\n</b>"
    );
}
