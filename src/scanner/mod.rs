pub mod deps;
pub mod error;
pub mod extract;
pub mod git;
pub mod impact;
pub mod language;
pub mod matcher;
pub mod rules;
pub mod scope;
pub mod symbols;
pub mod types;
pub mod walker;

pub use deps::{read_external_deps, ExternalDeps};
pub use error::{ScanError, ScanResult};
pub use impact::ImportIndex;
pub use language::Language;
pub use symbols::{FileAnalysis, Symbol, SymbolKind, SymbolRole, SymbolScanner};
pub use types::{DiffStat, FileInfo, ImpactInfo};

use std::path::Path;

/// Root-relative path with forward slashes, as reported in output. Falls
/// back to the path as given when it is not under `root`.
pub(crate) fn relative_slash_path(root: &Path, file: &str) -> String {
    let path = Path::new(file);
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
