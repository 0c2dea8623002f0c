//! Repository context (file tree + README) that seeds the diagram pipeline.

use crate::{Error, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Path fragments (matched case-insensitively anywhere in the relative path) that are left out
/// of the file tree: dependency folders, build caches, binaries, and media.
pub const EXCLUDED_PATTERNS: &[&str] = &[
    "node_modules",
    "vendor",
    "venv",
    ".min.",
    ".pyc",
    ".pyo",
    ".pyd",
    ".so",
    ".dll",
    ".class",
    ".jpg",
    ".jpeg",
    ".png",
    ".gif",
    ".ico",
    ".svg",
    ".ttf",
    ".woff",
    ".webp",
    "__pycache__",
    ".cache",
    ".tmp",
    "yarn.lock",
    "poetry.lock",
    ".vscode",
    ".idea",
    ".git",
];

/// README file names, in lookup order.
pub const README_CANDIDATES: &[&str] = &[
    "README.md",
    "README",
    "readme.md",
    "Readme.md",
    "README.txt",
];

pub fn is_included(relative: &str) -> bool {
    let lower = relative.to_ascii_lowercase();
    !EXCLUDED_PATTERNS.iter().any(|p| lower.contains(p))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(Error::NotADirectory(dir.to_path_buf()))
    }
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Lists every file and directory under `dir` as sorted, `/`-separated relative paths, one per
/// line, skipping anything matched by [`EXCLUDED_PATTERNS`].
pub fn file_tree(dir: &Path) -> Result<String> {
    ensure_dir(dir)?;

    // An excluded directory excludes its whole subtree, so pruning here is equivalent to
    // filtering every entry.
    let walker = WalkDir::new(dir).min_depth(1).into_iter().filter_entry(|e| {
        relative_slash_path(dir, e.path()).is_some_and(|rel| is_included(&rel))
    });

    let mut paths = BTreeSet::new();
    for entry in walker {
        let entry = entry?;
        if let Some(rel) = relative_slash_path(dir, entry.path()) {
            paths.insert(rel);
        }
    }
    tracing::debug!(dir = %dir.display(), entries = paths.len(), "collected file tree");
    Ok(paths.into_iter().collect::<Vec<_>>().join("\n"))
}

/// Reads the first README found in the root of `dir` (see [`README_CANDIDATES`]).
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_readme(dir: &Path) -> Result<String> {
    ensure_dir(dir)?;
    for name in README_CANDIDATES {
        let path = dir.join(name);
        if !path.is_file() {
            continue;
        }
        let bytes = std::fs::read(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "using README");
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }
    Err(Error::MissingReadme(dir.to_path_buf()))
}

/// Rough token estimate for prompt budgeting (about four characters per token).
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoContext {
    pub root: PathBuf,
    pub file_tree: String,
    pub readme: String,
}

impl RepoContext {
    pub fn collect(dir: &Path) -> Result<Self> {
        Ok(Self {
            root: dir.to_path_buf(),
            file_tree: file_tree(dir)?,
            readme: read_readme(dir)?,
        })
    }

    /// Estimated prompt size of the file tree plus README.
    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&format!("{}\n{}", self.file_tree, self.readme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn sample_repo() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path();
        fs::create_dir_all(root.join("src/api")).expect("mkdir");
        fs::create_dir_all(root.join("node_modules/left-pad")).expect("mkdir");
        fs::create_dir_all(root.join(".git/objects")).expect("mkdir");
        fs::write(root.join("src/api/main.rs"), "fn main() {}").expect("write");
        fs::write(root.join("src/logo.PNG"), [0u8; 4]).expect("write");
        fs::write(root.join("node_modules/left-pad/index.js"), "").expect("write");
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").expect("write");
        fs::write(root.join("Cargo.toml"), "[package]").expect("write");
        fs::write(root.join("README.md"), "# Sample\n").expect("write");
        tmp
    }

    #[test]
    fn file_tree_is_sorted_and_skips_excluded_paths() {
        let repo = sample_repo();
        let tree = file_tree(repo.path()).expect("tree");
        assert_eq!(tree, "Cargo.toml\nREADME.md\nsrc\nsrc/api\nsrc/api/main.rs");
    }

    #[test]
    fn readme_lookup_follows_candidate_order() {
        let repo = sample_repo();
        fs::write(repo.path().join("README.txt"), "fallback").expect("write");
        assert_eq!(read_readme(repo.path()).expect("readme"), "# Sample\n");

        fs::remove_file(repo.path().join("README.md")).expect("rm");
        assert_eq!(read_readme(repo.path()).expect("readme"), "fallback");
    }

    #[test]
    fn missing_readme_and_non_directories_are_errors() {
        let tmp = tempfile::tempdir().expect("tempdir");
        assert!(matches!(read_readme(tmp.path()), Err(Error::MissingReadme(_))));

        let file = tmp.path().join("plain.txt");
        fs::write(&file, "x").expect("write");
        assert!(matches!(file_tree(&file), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn context_estimates_tokens() {
        let repo = sample_repo();
        let ctx = RepoContext::collect(repo.path()).expect("context");
        let combined = format!("{}\n{}", ctx.file_tree, ctx.readme);
        assert_eq!(ctx.estimated_tokens(), combined.chars().count().div_ceil(4));
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
