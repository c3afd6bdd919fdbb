use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::error::ScanResult;
use super::extract;
use super::matcher::{Matcher, RawMatch};
use super::relative_slash_path;
use super::rules::RulePass;

/// What kind of lexical container a scope range came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Class,
    Interface,
    Namespace,
    Enum,
    Struct,
}

impl ContainerKind {
    /// Derive the kind from the `-container-<kind>` infix of a rule id.
    pub fn from_rule_id(rule_id: &str) -> Option<Self> {
        if rule_id.contains("-container-class") {
            Some(ContainerKind::Class)
        } else if rule_id.contains("-container-interface") {
            Some(ContainerKind::Interface)
        } else if rule_id.contains("-container-namespace") {
            Some(ContainerKind::Namespace)
        } else if rule_id.contains("-container-enum") {
            Some(ContainerKind::Enum)
        } else if rule_id.contains("-container-struct") {
            Some(ContainerKind::Struct)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Class => "class",
            ContainerKind::Interface => "interface",
            ContainerKind::Namespace => "namespace",
            ContainerKind::Enum => "enum",
            ContainerKind::Struct => "struct",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scope-creating declaration and the line range of its body.
/// `start_line` is the declaration line; the range is half-open on the
/// start so the declaration itself resolves to the enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeContainer {
    pub kind: ContainerKind,
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Read-through cache of file contents, shared between scope queries.
/// Buffers are immutable once loaded.
pub struct FileCache {
    content: RwLock<HashMap<PathBuf, Arc<[u8]>>>,
}

impl FileCache {
    pub fn new() -> Self {
        FileCache {
            content: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, path: &Path) -> std::io::Result<Arc<[u8]>> {
        if let Some(data) = self.content.read().expect("file cache poisoned").get(path) {
            return Ok(Arc::clone(data));
        }

        let mut map = self.content.write().expect("file cache poisoned");
        // Re-check: another reader may have loaded it while we waited.
        if let Some(data) = map.get(path) {
            return Ok(Arc::clone(data));
        }
        let data: Arc<[u8]> = std::fs::read(path)?.into();
        map.insert(path.to_path_buf(), Arc::clone(&data));
        Ok(data)
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the container-only matcher pass and group the recovered scope
/// ranges by relative file path.
pub fn resolve_containers(
    matcher: &Matcher,
    root: &Path,
    cache: &FileCache,
) -> ScanResult<HashMap<String, Vec<ScopeContainer>>> {
    let matches = matcher.run(RulePass::Containers, root)?;

    let mut result: HashMap<String, Vec<ScopeContainer>> = HashMap::new();
    for m in &matches {
        let Some(container) = parse_container_match(m, cache) else {
            continue;
        };
        let rel = relative_slash_path(root, &m.file);
        result.entry(rel).or_default().push(container);
    }
    debug!(files = result.len(), "container pass complete");
    Ok(result)
}

/// Build a `ScopeContainer` from one container-rule match, or `None` when
/// the kind or name cannot be recovered.
fn parse_container_match(m: &RawMatch, cache: &FileCache) -> Option<ScopeContainer> {
    let kind = ContainerKind::from_rule_id(&m.rule_id)?;
    let name = container_name(&m.text, kind)?;
    // Matches for decorated declarations begin at the decorator; the scope
    // starts at the declaration keyword, and the decorator's own argument
    // braces must not terminate the brace scan.
    let start_line = m.range.start.line + leading_decorator_lines(&m.text);

    let end_line = match cache.get(Path::new(&m.file)) {
        Ok(content) => find_end_line(&content, start_line),
        Err(err) => {
            // Unreadable file: fall back to the extent of the match itself.
            warn!(file = %m.file, %err, "container end-line fallback");
            start_line + m.text.matches('\n').count()
        }
    };

    Some(ScopeContainer {
        kind,
        name,
        start_line,
        end_line,
    })
}

/// Number of complete leading lines of `text` that are decorators. A
/// decorator sharing its line with the declaration itself counts for zero.
fn leading_decorator_lines(text: &str) -> usize {
    let lines: Vec<&str> = text.trim_start().lines().collect();
    let mut count = 0;
    for (i, line) in lines.iter().enumerate() {
        if line.trim_start().starts_with('@') && i + 1 < lines.len() {
            count += 1;
        } else {
            break;
        }
    }
    count
}

/// Extract the container name from its declaration text.
pub fn container_name(text: &str, kind: ContainerKind) -> Option<String> {
    let text = extract::strip_decorator_lines(text.trim());

    let text = text.strip_prefix("export ").unwrap_or(text);
    let text = text.strip_prefix("default ").unwrap_or(text);
    let text = text.strip_prefix("declare ").unwrap_or(text);
    let text = text.strip_prefix("abstract ").unwrap_or(text);
    let text = text.strip_prefix("const ").unwrap_or(text); // const enum

    // Go containers: type NAME struct { / type NAME interface {
    if kind == ContainerKind::Struct
        || (kind == ContainerKind::Interface && text.starts_with("type "))
    {
        let rest = text.strip_prefix("type ")?;
        let name = rest
            .split(|c: char| c == ' ' || c == '\t')
            .next()?
            .trim();
        return valid(name);
    }

    let keyword = match kind {
        ContainerKind::Class => "class ",
        ContainerKind::Interface => "interface ",
        ContainerKind::Enum => "enum ",
        ContainerKind::Namespace => {
            if text.starts_with("namespace ") {
                "namespace "
            } else {
                "module "
            }
        }
        ContainerKind::Struct => unreachable!("handled above"),
    };

    let rest = text.strip_prefix(keyword)?;
    let name = rest
        .find(|c: char| matches!(c, ' ' | '<' | '{' | '\n'))
        .map(|idx| &rest[..idx])
        .unwrap_or(rest)
        .trim();
    valid(name)
}

/// Line (0-indexed) on which the brace-delimited block starting at
/// `start_line` closes. Falls back to the last line when no brace pair is
/// found.
pub fn find_end_line(content: &[u8], start_line: usize) -> usize {
    let lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
    let mut depth = 0usize;
    let mut started = false;

    for (i, line) in lines.iter().enumerate().skip(start_line) {
        for &b in *line {
            match b {
                b'{' => {
                    depth += 1;
                    started = true;
                }
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if started && depth == 0 {
                        return i;
                    }
                }
                _ => {}
            }
        }
    }
    lines.len().saturating_sub(1)
}

/// Scope string for a symbol at `line`: the innermost container whose range
/// strictly contains the line, or `"global"`. A declaration on a container's
/// own start line is outside it.
pub fn scope_of(line: usize, containers: &[ScopeContainer]) -> String {
    let mut best: Option<&ScopeContainer> = None;
    for c in containers {
        if line > c.start_line && line <= c.end_line {
            match best {
                Some(b) if b.start_line >= c.start_line => {}
                _ => best = Some(c),
            }
        }
    }
    match best {
        Some(c) => format!("{}:{}", c.kind, c.name),
        None => "global".to_string(),
    }
}

fn valid(name: &str) -> Option<String> {
    // Names may run into punctuation when the declaration is compact
    // (`class Name{`); keep the leading identifier run.
    let end = name
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(idx, _)| idx)
        .unwrap_or(name.len());
    let head = &name[..end];
    if head.is_empty() || head.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(head.to_string())
}
