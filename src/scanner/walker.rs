use std::path::Path;

use anyhow::Result;
use ignore::WalkBuilder;
use tracing::debug;

use super::types::FileInfo;

/// Directories skipped outright, before gitignore evaluation.
const IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "vendor",
    "Pods",
    "build",
    "DerivedData",
    ".idea",
    ".vscode",
    "__pycache__",
    "venv",
    ".venv",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "htmlcov",
    ".tox",
    "dist",
    ".next",
    ".nuxt",
    "target",
    ".gradle",
    ".cargo",
];

/// Walk the tree and collect every file that survives gitignore rules and
/// the hardcoded skip list. Paths are root-relative with forward slashes,
/// sorted for stable output.
pub fn scan_files(root: &Path) -> Result<Vec<FileInfo>> {
    let mut files = Vec::new();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            !(entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
                && IGNORED_DIRS.contains(&name.as_ref()))
        })
        .build();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);

        files.push(FileInfo {
            path: rel.to_string_lossy().replace('\\', "/"),
            size,
            ext,
            is_new: false,
            added: 0,
            removed: 0,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(count = files.len(), root = %root.display(), "walked tree");
    Ok(files)
}
