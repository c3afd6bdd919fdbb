use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use super::error::ScanResult;
use super::extract;
use super::language::Language;
use super::matcher::{Matcher, RawMatch};
use super::relative_slash_path;
use super::rules::RulePass;
use super::scope::{self, FileCache, ScopeContainer};

/// What a symbol is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Import,
    Function,
    Method,
    Class,
    Interface,
    Type,
    Enum,
    Namespace,
    Constant,
    Variable,
    Field,
    Property,
    Decorator,
}

/// Whether an occurrence defines the symbol or merely uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolRole {
    Definition,
    Reference,
}

/// One extracted code entity.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub role: SymbolRole,
    /// 0-indexed match start position.
    pub line: usize,
    pub column: usize,
    /// `"global"` or `"<kind>:<name>"` of the innermost enclosing container.
    pub scope: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

/// All symbols extracted from one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileAnalysis {
    pub path: String,
    pub language: Language,
    pub symbols: Vec<Symbol>,
}

/// The trailing rule-id segment that selects an extractor. Tests are
/// ordered most-specific-first because some suffixes end in others
/// (`-arrow-functions` ends in `-functions`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    Imports,
    ImportAliases,
    ArrowFunctions,
    FunctionSignatures,
    GeneratorFunctions,
    FunctionExpressions,
    Functions,
    Structs,
    Classes,
    Interfaces,
    MethodSignatures,
    Methods,
    PropertySignatures,
    FieldDefinitions,
    CallSignatures,
    ConstructSignatures,
    IndexSignatures,
    StaticBlocks,
    AmbientDeclarations,
    VariableDeclarations,
    Constants,
    Types,
    Vars,
    Lexical,
    Enums,
    Namespaces,
    Decorators,
    RefFunctionCalls,
    RefNewExpressions,
    RefTypeReferences,
}

const FAMILY_SUFFIXES: &[(&str, RuleFamily)] = &[
    ("-ref-function-calls", RuleFamily::RefFunctionCalls),
    ("-ref-new-expressions", RuleFamily::RefNewExpressions),
    ("-ref-type-references", RuleFamily::RefTypeReferences),
    ("-import-aliases", RuleFamily::ImportAliases),
    ("-imports", RuleFamily::Imports),
    ("-arrow-functions", RuleFamily::ArrowFunctions),
    ("-function-signatures", RuleFamily::FunctionSignatures),
    ("-generator-functions", RuleFamily::GeneratorFunctions),
    ("-function-expressions", RuleFamily::FunctionExpressions),
    ("-functions", RuleFamily::Functions),
    ("-method-signatures", RuleFamily::MethodSignatures),
    ("-methods", RuleFamily::Methods),
    ("-property-signatures", RuleFamily::PropertySignatures),
    ("-field-definitions", RuleFamily::FieldDefinitions),
    ("-call-signatures", RuleFamily::CallSignatures),
    ("-construct-signatures", RuleFamily::ConstructSignatures),
    ("-index-signatures", RuleFamily::IndexSignatures),
    ("-static-blocks", RuleFamily::StaticBlocks),
    ("-ambient-declarations", RuleFamily::AmbientDeclarations),
    ("-variable-declarations", RuleFamily::VariableDeclarations),
    ("-structs", RuleFamily::Structs),
    ("-classes", RuleFamily::Classes),
    ("-interfaces", RuleFamily::Interfaces),
    ("-constants", RuleFamily::Constants),
    ("-types", RuleFamily::Types),
    ("-vars", RuleFamily::Vars),
    ("-lexical", RuleFamily::Lexical),
    ("-enums", RuleFamily::Enums),
    ("-namespaces", RuleFamily::Namespaces),
    ("-decorators", RuleFamily::Decorators),
];

impl RuleFamily {
    pub fn from_rule_id(rule_id: &str) -> Option<Self> {
        FAMILY_SUFFIXES
            .iter()
            .find(|(suffix, _)| rule_id.ends_with(suffix))
            .map(|(_, family)| *family)
    }

    /// The symbol kind implied by the rule family alone. The `-lexical` and
    /// `-ambient-declarations` families refine this during extraction.
    pub fn kind(&self) -> SymbolKind {
        use RuleFamily::*;
        match self {
            Imports | ImportAliases => SymbolKind::Import,
            Functions | ArrowFunctions | FunctionSignatures | GeneratorFunctions
            | FunctionExpressions | RefFunctionCalls => SymbolKind::Function,
            Methods | MethodSignatures | CallSignatures | ConstructSignatures
            | StaticBlocks => SymbolKind::Method,
            Structs | Classes | RefNewExpressions => SymbolKind::Class,
            Interfaces => SymbolKind::Interface,
            Types | RefTypeReferences => SymbolKind::Type,
            Enums => SymbolKind::Enum,
            Namespaces => SymbolKind::Namespace,
            Constants => SymbolKind::Constant,
            Vars | VariableDeclarations | Lexical | AmbientDeclarations => SymbolKind::Variable,
            FieldDefinitions => SymbolKind::Field,
            PropertySignatures | IndexSignatures => SymbolKind::Property,
            Decorators => SymbolKind::Decorator,
        }
    }

    /// Member families get a provisional scope from the surrounding line
    /// buffer when no container map is available.
    fn is_member(&self) -> bool {
        matches!(
            self,
            RuleFamily::Methods
                | RuleFamily::MethodSignatures
                | RuleFamily::PropertySignatures
                | RuleFamily::FieldDefinitions
        )
    }
}

/// Reference role holds exactly when the rule id carries a `-ref-` segment.
pub fn role_of(rule_id: &str) -> SymbolRole {
    if rule_id.contains("-ref-") {
        SymbolRole::Reference
    } else {
        SymbolRole::Definition
    }
}

/// Runs the container and symbol passes and assembles typed analyses.
pub struct SymbolScanner {
    matcher: Matcher,
}

impl SymbolScanner {
    pub fn new() -> ScanResult<Self> {
        Ok(SymbolScanner {
            matcher: Matcher::new()?,
        })
    }

    /// Scan a directory tree into per-file symbol analyses.
    pub fn scan(&self, root: &Path, include_refs: bool) -> ScanResult<Vec<FileAnalysis>> {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let cache = FileCache::new();

        let containers = match scope::resolve_containers(&self.matcher, &root, &cache) {
            Ok(containers) => containers,
            Err(err) => {
                // Scope resolution is best-effort; symbols still extract.
                warn!(%err, "container pass failed, continuing without scope resolution");
                HashMap::new()
            }
        };

        let matches = self.matcher.run(RulePass::Symbols { include_refs }, &root)?;
        debug!(matches = matches.len(), "assembling symbols");
        Ok(assemble(&root, &matches, &containers))
    }
}

/// Fold raw matches into deduplicated per-file analyses. Files and symbols
/// keep the order the matcher emitted them.
pub fn assemble(
    root: &Path,
    matches: &[RawMatch],
    containers: &HashMap<String, Vec<ScopeContainer>>,
) -> Vec<FileAnalysis> {
    let mut analyses: Vec<FileAnalysis> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for m in matches {
        let Some(family) = RuleFamily::from_rule_id(&m.rule_id) else {
            warn!(rule = %m.rule_id, "unknown rule family");
            continue;
        };
        let Some(lang) = Language::from_rule_id(&m.rule_id) else {
            warn!(rule = %m.rule_id, "unknown language prefix");
            continue;
        };

        let rel = relative_slash_path(root, &m.file);
        let idx = *index.entry(rel.clone()).or_insert_with(|| {
            analyses.push(FileAnalysis {
                path: rel,
                language: lang,
                symbols: Vec::new(),
            });
            analyses.len() - 1
        });

        let role = role_of(&m.rule_id);
        let line = m.range.start.line;

        let scope = initial_scope(family, m, lang);
        let modifiers = if role == SymbolRole::Definition {
            extract::modifiers(line_buffer(m), lang)
        } else {
            Vec::new()
        };

        for (name, kind) in extract_names(family, m, lang) {
            let mut symbol = Symbol {
                name,
                kind,
                role,
                line,
                column: m.range.start.column,
                scope: scope.clone(),
                modifiers: modifiers.clone(),
            };

            if let Some(file_containers) = containers.get(&analyses[idx].path) {
                if !file_containers.is_empty() {
                    symbol.scope = scope::scope_of(line, file_containers);
                }
            }
            // A Go method's receiver type names its scope directly.
            if lang == Language::Go && family == RuleFamily::Methods {
                if let Some(receiver) = extract::go_receiver_type(&m.text) {
                    symbol.scope = format!("struct:{receiver}");
                }
            }

            analyses[idx].symbols.push(symbol);
        }
    }

    for analysis in &mut analyses {
        dedupe_symbols(&mut analysis.symbols);
    }
    analyses
}

/// Dispatch the extractor for one match. Returns zero or more
/// `(name, kind)` pairs; most families yield at most one.
fn extract_names(family: RuleFamily, m: &RawMatch, lang: Language) -> Vec<(String, SymbolKind)> {
    let kind = family.kind();
    let text = m.text.as_str();

    let single = |name: Option<String>| -> Vec<(String, SymbolKind)> {
        name.map(|n| (n, kind)).into_iter().collect()
    };
    let many = |names: Vec<String>| -> Vec<(String, SymbolKind)> {
        names.into_iter().map(|n| (n, kind)).collect()
    };

    match family {
        RuleFamily::Imports => single(
            m.meta_var("PATH")
                .map(str::to_string)
                .or_else(|| extract::import_path(text, lang)),
        ),
        RuleFamily::ImportAliases => single(extract::import_alias_name(text, lang)),
        RuleFamily::ArrowFunctions => single(extract::arrow_function_name(line_buffer(m), lang)),
        RuleFamily::FunctionSignatures => single(extract::function_signature_name(text, lang)),
        RuleFamily::GeneratorFunctions => single(extract::generator_function_name(text, lang)),
        RuleFamily::FunctionExpressions => single(extract::function_expression_name(text, lang)),
        RuleFamily::Functions => single(extract::function_name(text, lang)),
        RuleFamily::Structs | RuleFamily::Classes => single(extract::class_name(text, lang)),
        RuleFamily::Interfaces => single(extract::interface_name(text, lang)),
        RuleFamily::MethodSignatures => single(extract::method_signature_name(text, lang)),
        RuleFamily::Methods => single(extract::method_name(text, lang)),
        RuleFamily::PropertySignatures => single(extract::property_signature_name(text, lang)),
        RuleFamily::FieldDefinitions => single(extract::field_name(text, lang)),
        RuleFamily::CallSignatures => single(extract::call_signature(text)),
        RuleFamily::ConstructSignatures => single(extract::construct_signature(text)),
        RuleFamily::IndexSignatures => single(extract::index_signature(text)),
        RuleFamily::StaticBlocks => vec![("(static block)".to_string(), kind)],
        RuleFamily::AmbientDeclarations => extract::ambient_declarations(text, lang),
        RuleFamily::VariableDeclarations => many(extract::var_declaration_names(text, lang)),
        RuleFamily::Constants => many(extract::constant_names(text, lang)),
        RuleFamily::Types => single(extract::type_name(text, lang)),
        RuleFamily::Vars => many(extract::var_names(text, lang)),
        RuleFamily::Lexical => {
            // One rule captures both const and let/var; the first token
            // decides which kind the symbols get.
            let trimmed = text.trim();
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            if trimmed.starts_with("const ") {
                extract::constant_names(text, lang)
                    .into_iter()
                    .map(|n| (n, SymbolKind::Constant))
                    .collect()
            } else {
                extract::var_names(text, lang)
                    .into_iter()
                    .map(|n| (n, SymbolKind::Variable))
                    .collect()
            }
        }
        RuleFamily::Enums => single(extract::enum_name(text, lang)),
        RuleFamily::Namespaces => single(extract::namespace_name(text, lang)),
        RuleFamily::Decorators => single(extract::decorator_name(text, lang)),
        RuleFamily::RefFunctionCalls => single(extract::call_expression_name(text)),
        RuleFamily::RefNewExpressions => single(extract::new_expression_name(text)),
        RuleFamily::RefTypeReferences => single(extract::type_reference_name(text)),
    }
}

/// Provisional scope before the container map is consulted. Member-shaped
/// matches fall back to a line-buffer heuristic that recognizes `class`
/// and `interface` heads.
fn initial_scope(family: RuleFamily, m: &RawMatch, lang: Language) -> String {
    if family.is_member() {
        scope_from_context(line_buffer(m), lang)
    } else {
        "global".to_string()
    }
}

fn scope_from_context(lines: &str, lang: Language) -> String {
    if !lang.is_ecmascript() {
        return "global".to_string();
    }

    for (keyword, label) in [("class ", "class"), ("interface ", "interface")] {
        if let Some(idx) = lines.find(keyword) {
            let rest = &lines[idx + keyword.len()..];
            if let Some(end) = rest.find(|c: char| matches!(c, ' ' | '<' | '{' | '\n')) {
                let name = rest[..end].trim();
                if extract::is_identifier(name) {
                    return format!("{label}:{name}");
                }
            }
        }
    }
    "global".to_string()
}

/// The full source lines spanned by a match, falling back to the match text
/// when the matcher did not report them.
fn line_buffer(m: &RawMatch) -> &str {
    if m.lines.is_empty() {
        &m.text
    } else {
        &m.lines
    }
}

/// Drop repeated `(name, kind, role, line)` entries, keeping the first.
fn dedupe_symbols(symbols: &mut Vec<Symbol>) {
    let mut seen: HashSet<(String, SymbolKind, SymbolRole, usize)> = HashSet::new();
    symbols.retain(|s| seen.insert((s.name.clone(), s.kind, s.role, s.line)));
}
