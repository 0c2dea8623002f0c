pub(crate) const EXPLANATION_PROMPT: &str = r#"You explain to a principal software engineer how to draw an accurate system design diagram of a project.

The user message contains the project's complete file tree in <file_tree> tags and its README in <readme> tags.

1. Identify what kind of project this is (web application, library, CLI tool, compiler, service, ...) and what it is for.
2. Study the directory structure: top-level directories, naming patterns that reveal architecture (layers, services, packages), configuration and deployment files.
3. Name the main components and how they interact: data flow, external services, storage, entry points.
4. Recommend how to lay out the diagram: grouping into subgraphs, direction, which relationships to draw and how to label them.

Write the explanation inside <explanation> tags. Be specific to this project; do not give generic diagramming advice."#;

pub(crate) const COMPONENT_MAPPING_PROMPT: &str = r#"You map the components of a system design explanation onto concrete files and directories.

The user message contains the explanation in <explanation> tags and the project's file tree in <file_tree> tags.

For every component named in the explanation, list the file or directory paths from the file tree that implement it. Use only paths that appear in the file tree. Skip components with no matching path.

Answer in this exact form:
<component_mapping>
1. [Component name]: [path/one], [path/two]
2. [Component name]: [path]
</component_mapping>"#;

pub(crate) const DIAGRAM_PROMPT: &str = r#"You turn a system design explanation into a Mermaid.js flowchart.

The user message contains the explanation in <explanation> tags and a component-to-path mapping in <component_mapping> tags.

Rules:
- Start with `flowchart TD` (or `flowchart LR` when the system is wide rather than deep).
- Use subgraphs for layers or services; give every node a short, unique id.
- Put node labels with special characters in double quotes: A["Client (web/mobile)"].
- Label edges with the interaction they represent.
- For every mapped component add a click event with its path exactly as mapped: click A "src/api"
- Keep styling minimal: at most a few classDef lines.

Return only valid Mermaid code. No explanations, no Markdown fences."#;
