use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use super::symbols::{FileAnalysis, SymbolKind, SymbolRole};
use super::types::{FileInfo, ImpactInfo};

fn ext_pattern() -> &'static Regex {
    static EXT_RE: OnceLock<Regex> = OnceLock::new();
    EXT_RE.get_or_init(|| {
        Regex::new(r"\.(py|go|js|ts|jsx|tsx|mjs|rb|rs|c|h|cpp|hpp|java|swift|kt|sh)$")
            .expect("extension pattern")
    })
}

/// Reduce an import string to its comparison key: the last `/`-delimited
/// segment with any trailing source extension stripped.
pub fn import_key(import: &str) -> String {
    let segment = import
        .trim_matches(|c| c == '"' || c == '\'')
        .rsplit('/')
        .next()
        .unwrap_or(import);
    ext_pattern().replace(segment, "").to_string()
}

/// Reverse-import map over a set of analyses.
pub struct ImportIndex {
    imports_of: BTreeMap<String, BTreeSet<String>>,
    importers_of: BTreeMap<String, BTreeSet<String>>,
}

impl ImportIndex {
    pub fn build(analyses: &[FileAnalysis]) -> Self {
        let mut imports_of: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut importers_of: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for analysis in analyses {
            let keys: BTreeSet<String> = analysis
                .symbols
                .iter()
                .filter(|s| s.kind == SymbolKind::Import && s.role == SymbolRole::Definition)
                .map(|s| import_key(&s.name))
                .filter(|k| !k.is_empty())
                .collect();

            for key in &keys {
                importers_of
                    .entry(key.clone())
                    .or_default()
                    .insert(analysis.path.clone());
            }
            imports_of.insert(analysis.path.clone(), keys);
        }

        ImportIndex {
            imports_of,
            importers_of,
        }
    }

    /// Import keys recorded for one file.
    pub fn imports_of(&self, file: &str) -> Option<&BTreeSet<String>> {
        self.imports_of.get(file)
    }

    /// Files that import `target_file`, matched on the target's stem.
    /// Files in the target's own directory don't count (same-package
    /// convention).
    pub fn who_imports(&self, target_file: &str) -> Vec<String> {
        let stem = file_stem(target_file);
        if stem.is_empty() {
            return Vec::new();
        }
        let target_dir = parent_dir(target_file);

        match self.importers_of.get(&stem) {
            Some(files) => files
                .iter()
                .filter(|f| parent_dir(f) != target_dir && f.as_str() != target_file)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Importer counts for each changed file, descending; path order breaks
    /// ties.
    pub fn impact(&self, changed: &[FileInfo]) -> Vec<ImpactInfo> {
        let mut impacts: Vec<ImpactInfo> = changed
            .iter()
            .map(|f| ImpactInfo {
                file: f.path.clone(),
                used_by: self.who_imports(&f.path).len(),
            })
            .filter(|i| i.used_by > 0)
            .collect();

        impacts.sort_by(|a, b| b.used_by.cmp(&a.used_by).then(a.file.cmp(&b.file)));
        impacts
    }
}

fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

fn parent_dir(path: &str) -> String {
    Path::new(path)
        .parent()
        .and_then(|p| p.to_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::language::Language;
    use crate::scanner::symbols::Symbol;

    fn import(name: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Import,
            role: SymbolRole::Definition,
            line: 0,
            column: 0,
            scope: "global".to_string(),
            modifiers: Vec::new(),
        }
    }

    fn analysis(path: &str, imports: &[&str]) -> FileAnalysis {
        FileAnalysis {
            path: path.to_string(),
            language: Language::TypeScript,
            symbols: imports.iter().map(|i| import(i)).collect(),
        }
    }

    fn info(path: &str) -> FileInfo {
        FileInfo {
            path: path.to_string(),
            size: 0,
            ext: String::new(),
            is_new: false,
            added: 0,
            removed: 0,
        }
    }

    #[test]
    fn test_import_key() {
        assert_eq!(import_key("./utils"), "utils");
        assert_eq!(import_key("../lib/utils.ts"), "utils");
        assert_eq!(import_key("'src/render/tree.js'"), "tree");
        assert_eq!(import_key("fmt"), "fmt");
        assert_eq!(import_key("github.com/pkg/errors"), "errors");
    }

    #[test]
    fn test_who_imports_matches_stem() {
        let analyses = vec![
            analysis("src/app.ts", &["./render/tree", "./utils"]),
            analysis("src/render/tree.ts", &["../utils"]),
            analysis("src/utils.ts", &[]),
        ];
        let index = ImportIndex::build(&analyses);

        let importers = index.who_imports("src/utils.ts");
        assert_eq!(importers, vec!["src/render/tree.ts".to_string()]);
    }

    #[test]
    fn test_same_directory_is_not_an_importer() {
        let analyses = vec![
            analysis("pkg/server.go", &["util"]),
            analysis("pkg/util.go", &[]),
            analysis("cmd/main.go", &["util"]),
        ];
        let index = ImportIndex::build(&analyses);

        let importers = index.who_imports("pkg/util.go");
        // pkg/server.go shares the directory and is excluded
        assert_eq!(importers, vec!["cmd/main.go".to_string()]);
    }

    #[test]
    fn test_impact_orders_by_descending_count() {
        let analyses = vec![
            analysis("a.ts", &["./hot", "./warm"]),
            analysis("b.ts", &["./hot"]),
            analysis("c.ts", &["./hot", "./warm"]),
            analysis("sub/hot.ts", &[]),
            analysis("sub/warm.ts", &[]),
            analysis("cold.ts", &[]),
        ];
        let index = ImportIndex::build(&analyses);

        let impacts = index.impact(&[info("sub/hot.ts"), info("sub/warm.ts"), info("cold.ts")]);
        assert_eq!(impacts.len(), 2);
        assert_eq!(impacts[0].file, "sub/hot.ts");
        assert_eq!(impacts[0].used_by, 3);
        assert_eq!(impacts[1].file, "sub/warm.ts");
        assert_eq!(impacts[1].used_by, 2);
    }

    #[test]
    fn test_imports_of() {
        let analyses = vec![analysis("x.ts", &["./a.ts", "lib/b"])];
        let index = ImportIndex::build(&analyses);
        let keys = index.imports_of("x.ts").unwrap();
        assert!(keys.contains("a"));
        assert!(keys.contains("b"));
    }
}
