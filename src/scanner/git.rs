use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

use super::types::{DiffStat, FileInfo};

/// Everything known about the working tree's changes against a ref.
#[derive(Debug, Default)]
pub struct DiffInfo {
    /// All changed files (modified + untracked).
    pub changed: HashSet<String>,
    /// New files not yet tracked.
    pub untracked: HashSet<String>,
    /// Per-file +/- line counts for tracked changes.
    pub stats: HashMap<String, DiffStat>,
}

/// Collect changed and untracked files relative to `reference`.
pub fn diff_info(root: &Path, reference: &str) -> Result<DiffInfo> {
    let mut info = DiffInfo::default();

    let output = Command::new("git")
        .args(["diff", "--numstat", reference])
        .current_dir(root)
        .output()
        .context("Failed to run git diff")?;
    if !output.status.success() {
        bail!(
            "git diff against '{}' failed: {}",
            reference,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        // "-" marks a binary file with no line counts
        let added = parts[0].parse().unwrap_or(0);
        let removed = parts[1].parse().unwrap_or(0);
        let filename = parts[2..].join(" ");
        info.changed.insert(filename.clone());
        info.stats.insert(filename, DiffStat { added, removed });
    }

    let output = Command::new("git")
        .args(["ls-files", "--others", "--exclude-standard"])
        .current_dir(root)
        .output()
        .context("Failed to list untracked files")?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        let line = line.trim();
        if !line.is_empty() {
            info.changed.insert(line.to_string());
            info.untracked.insert(line.to_string());
        }
    }

    Ok(info)
}

/// Keep only changed files, annotating each with its diff counts.
pub fn filter_to_changed(files: Vec<FileInfo>, info: &DiffInfo) -> Vec<FileInfo> {
    files
        .into_iter()
        .filter(|f| info.changed.contains(&f.path))
        .map(|mut f| {
            f.is_new = info.untracked.contains(&f.path);
            if let Some(stat) = info.stats.get(&f.path) {
                f.added = stat.added;
                f.removed = stat.removed;
            }
            f
        })
        .collect()
}
