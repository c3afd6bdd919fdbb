use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::{ScanError, ScanResult};
use super::rules::{RuleBundle, RulePass};

/// Binary names probed for on PATH. `ast-grep` is checked first because
/// Linux ships an unrelated system `sg` (setgroups).
const MATCHER_BINARIES: &[&str] = &["ast-grep", "sg"];

/// One structural match as reported by the matcher's JSON output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMatch {
    /// Absolute path of the matched file.
    pub file: String,
    pub rule_id: String,
    pub range: MatchRange,
    /// The literal matched text span.
    pub text: String,
    /// The complete source lines spanned by the match.
    pub lines: String,
    pub meta_variables: MetaVariables,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchRange {
    pub start: MatchPosition,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchPosition {
    /// 0-indexed.
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetaVariables {
    pub single: HashMap<String, MetaVariable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetaVariable {
    pub text: String,
}

impl RawMatch {
    /// Captured text of a named meta-variable, if non-empty.
    pub fn meta_var(&self, name: &str) -> Option<&str> {
        self.meta_variables
            .single
            .get(name)
            .map(|v| v.text.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// Drives the external structural matcher over a directory tree.
pub struct Matcher {
    binary: &'static str,
    bundle: RuleBundle,
}

impl Matcher {
    /// Locate a matcher binary and materialize the rule bundle.
    pub fn new() -> ScanResult<Self> {
        let binary = find_matcher_binary().ok_or_else(|| ScanError::MatcherUnavailable {
            tried: MATCHER_BINARIES.join(", "),
        })?;
        let bundle = RuleBundle::materialize()?;
        debug!(binary, "matcher ready");
        Ok(Matcher { binary, bundle })
    }

    pub fn binary(&self) -> &str {
        self.binary
    }

    /// Run one matcher pass over `root` and parse the reported matches.
    ///
    /// The matcher exits non-zero when there are zero matches, so a failed
    /// exit with empty output is an empty result and a failed exit whose
    /// output still parses as a JSON array is accepted as-is. Anything else
    /// is a real subprocess failure.
    pub fn run(&self, pass: RulePass, root: &Path) -> ScanResult<Vec<RawMatch>> {
        let inline_rules = self.bundle.inline_rules(pass)?;
        if inline_rules.is_empty() {
            return Ok(Vec::new());
        }

        let output = Command::new(self.binary)
            .arg("scan")
            .arg("--inline-rules")
            .arg(&inline_rules)
            .arg("--json")
            .arg(root)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let payload = stdout.trim_start();

        // The matcher exits non-zero for zero matches; empty output means
        // exactly that.
        if payload.is_empty() {
            debug!(?pass, "matcher reported zero matches");
            return Ok(Vec::new());
        }

        if !output.status.success() {
            if !payload.starts_with('[') {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(status = %output.status, "matcher failed");
                return Err(ScanError::MatcherFailed {
                    status: output.status.to_string(),
                    stderr: stderr.chars().take(512).collect(),
                });
            }
        }

        let matches: Vec<RawMatch> = serde_json::from_str(payload)?;
        debug!(?pass, count = matches.len(), "matcher pass complete");
        Ok(matches)
    }
}

fn find_matcher_binary() -> Option<&'static str> {
    MATCHER_BINARIES.iter().copied().find(|name| on_path(name))
}

fn on_path(name: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(name);
        candidate.is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_match_parses_matcher_json() {
        let payload = r#"[{
            "file": "/tmp/proj/main.go",
            "ruleId": "go-functions",
            "range": {"start": {"line": 4, "column": 0}, "end": {"line": 6, "column": 1}},
            "text": "func main() {\n}",
            "lines": "func main() {\n}",
            "metaVariables": {"single": {"PATH": {"text": "fmt"}}}
        }]"#;
        let matches: Vec<RawMatch> = serde_json::from_str(payload).unwrap();
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.rule_id, "go-functions");
        assert_eq!(m.range.start.line, 4);
        assert_eq!(m.range.start.column, 0);
        assert_eq!(m.meta_var("PATH"), Some("fmt"));
        assert_eq!(m.meta_var("NAME"), None);
    }

    #[test]
    fn test_raw_match_tolerates_missing_fields() {
        let payload = r#"[{"file": "/tmp/a.ts", "ruleId": "ts-classes", "text": "class A {}"}]"#;
        let matches: Vec<RawMatch> = serde_json::from_str(payload).unwrap();
        assert_eq!(matches[0].lines, "");
        assert_eq!(matches[0].range.start.line, 0);
        assert!(matches[0].meta_variables.single.is_empty());
    }

    #[test]
    fn test_empty_meta_var_is_absent() {
        let payload = r#"[{
            "file": "/tmp/a.ts",
            "ruleId": "ts-imports",
            "text": "import './x'",
            "metaVariables": {"single": {"PATH": {"text": ""}}}
        }]"#;
        let matches: Vec<RawMatch> = serde_json::from_str(payload).unwrap();
        assert_eq!(matches[0].meta_var("PATH"), None);
    }
}
