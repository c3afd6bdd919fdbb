use serde::{Deserialize, Serialize};

/// A single file discovered in the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub size: u64,
    pub ext: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_new: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub added: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub removed: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Per-file +/- line counts from a diff.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DiffStat {
    pub added: usize,
    pub removed: usize,
}

/// How many other files depend on a changed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactInfo {
    pub file: String,
    pub used_by: usize,
}
