use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tracing::debug;

use super::error::{ScanError, ScanResult};

/// One embedded rule document, addressed by its bundle filename.
#[derive(Debug, Clone, Copy)]
pub struct RuleDoc {
    pub name: &'static str,
    pub body: &'static str,
}

/// The complete rule catalog compiled into the binary. Filename suffixes
/// classify each document: `-containers` for scope containers, `-refs` for
/// reference-capturing rules, anything else for definitions.
pub const RULE_DOCS: &[RuleDoc] = &[
    RuleDoc { name: "bash.yml", body: include_str!("rules/bash.yml") },
    RuleDoc { name: "c.yml", body: include_str!("rules/c.yml") },
    RuleDoc { name: "cpp.yml", body: include_str!("rules/cpp.yml") },
    RuleDoc { name: "go-containers.yml", body: include_str!("rules/go-containers.yml") },
    RuleDoc { name: "go-refs.yml", body: include_str!("rules/go-refs.yml") },
    RuleDoc { name: "go.yml", body: include_str!("rules/go.yml") },
    RuleDoc { name: "java.yml", body: include_str!("rules/java.yml") },
    RuleDoc { name: "js-containers.yml", body: include_str!("rules/js-containers.yml") },
    RuleDoc { name: "js-refs.yml", body: include_str!("rules/js-refs.yml") },
    RuleDoc { name: "js.yml", body: include_str!("rules/js.yml") },
    RuleDoc { name: "kotlin.yml", body: include_str!("rules/kotlin.yml") },
    RuleDoc { name: "py-refs.yml", body: include_str!("rules/py-refs.yml") },
    RuleDoc { name: "py.yml", body: include_str!("rules/py.yml") },
    RuleDoc { name: "ruby.yml", body: include_str!("rules/ruby.yml") },
    RuleDoc { name: "rust.yml", body: include_str!("rules/rust.yml") },
    RuleDoc { name: "swift.yml", body: include_str!("rules/swift.yml") },
    RuleDoc { name: "ts-containers.yml", body: include_str!("rules/ts-containers.yml") },
    RuleDoc { name: "ts-refs.yml", body: include_str!("rules/ts-refs.yml") },
    RuleDoc { name: "ts.yml", body: include_str!("rules/ts.yml") },
];

/// Which slice of the catalog a matcher invocation uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulePass {
    /// Definition rules, optionally including reference rules. Container
    /// documents are always excluded from this pass.
    Symbols { include_refs: bool },
    /// Container documents only, for scope recovery.
    Containers,
}

impl RulePass {
    /// Whether a bundle filename belongs to this pass.
    pub fn selects(&self, name: &str) -> bool {
        if !name.ends_with(".yml") {
            return false;
        }
        let is_container = name.contains("-containers");
        let is_ref = name.contains("-refs");
        match self {
            RulePass::Symbols { include_refs } => {
                !is_container && (*include_refs || !is_ref)
            }
            RulePass::Containers => is_container,
        }
    }
}

/// The rule catalog materialized to a scanner-lifetime temp directory.
/// The directory is removed when the bundle is dropped.
pub struct RuleBundle {
    dir: TempDir,
}

impl RuleBundle {
    /// Extract all embedded rule documents to a fresh temp directory.
    pub fn materialize() -> ScanResult<Self> {
        if RULE_DOCS.is_empty() {
            return Err(ScanError::RuleBundleCorrupt("no embedded rule documents".into()));
        }
        for doc in RULE_DOCS {
            if !doc.body.contains("id:") || !doc.body.contains("rule:") {
                return Err(ScanError::RuleBundleCorrupt(format!(
                    "document {} has no rule body",
                    doc.name
                )));
            }
        }

        let dir = TempDir::with_prefix("cartograph-rules-")?;
        for doc in RULE_DOCS {
            fs::write(dir.path().join(doc.name), doc.body)?;
        }
        debug!(rules = RULE_DOCS.len(), dir = %dir.path().display(), "materialized rule bundle");
        Ok(RuleBundle { dir })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Join the documents selected by `pass` into a single inline-rules
    /// string, separated the way the matcher expects. Documents are read
    /// back from the materialized directory in sorted filename order.
    pub fn inline_rules(&self, pass: RulePass) -> ScanResult<String> {
        let mut names: Vec<String> = fs::read_dir(self.dir.path())?
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| pass.selects(name))
            .collect();
        names.sort();

        let mut docs = Vec::with_capacity(names.len());
        for name in &names {
            docs.push(fs::read_to_string(self.dir.path().join(name))?);
        }
        Ok(docs.join("\n---\n"))
    }
}
