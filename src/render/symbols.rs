use std::collections::BTreeMap;

use anyhow::Result;
use colored::*;

use crate::scanner::{FileAnalysis, Symbol, SymbolKind, SymbolRole};

/// Controls symbol listing behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub show_references: bool,
    pub json: bool,
}

/// Display order for symbol kinds inside a scope.
const KIND_ORDER: &[SymbolKind] = &[
    SymbolKind::Import,
    SymbolKind::Class,
    SymbolKind::Interface,
    SymbolKind::Function,
    SymbolKind::Method,
    SymbolKind::Type,
    SymbolKind::Enum,
    SymbolKind::Namespace,
    SymbolKind::Constant,
    SymbolKind::Variable,
    SymbolKind::Field,
    SymbolKind::Property,
    SymbolKind::Decorator,
];

fn kind_label(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Import => "Imports",
        SymbolKind::Class => "Classes",
        SymbolKind::Interface => "Interfaces",
        SymbolKind::Function => "Functions",
        SymbolKind::Method => "Methods",
        SymbolKind::Type => "Types",
        SymbolKind::Enum => "Enums",
        SymbolKind::Namespace => "Namespaces",
        SymbolKind::Constant => "Constants",
        SymbolKind::Variable => "Vars",
        SymbolKind::Field => "Fields",
        SymbolKind::Property => "Properties",
        SymbolKind::Decorator => "Decorators",
    }
}

/// Render per-file symbol listings grouped by scope, or the raw JSON when
/// requested.
pub fn symbols(analyses: &[FileAnalysis], options: RenderOptions) -> Result<()> {
    if options.json {
        println!("{}", serde_json::to_string_pretty(analyses)?);
        return Ok(());
    }

    let mut sorted: Vec<&FileAnalysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    for analysis in sorted {
        if analysis.symbols.is_empty() {
            continue;
        }

        println!("\n{}", analysis.path.cyan());

        let by_scope = group_by_scope(&analysis.symbols);
        for (scope, symbols) in ordered_scopes(&by_scope) {
            let indent = if scope == "global" {
                "  "
            } else {
                println!("  {}", scope.dimmed());
                "    "
            };

            for &kind in KIND_ORDER {
                let of_kind: Vec<&Symbol> =
                    symbols.iter().copied().filter(|s| s.kind == kind).collect();
                if of_kind.is_empty() {
                    continue;
                }

                let defs = unique_names(
                    of_kind.iter().copied().filter(|s| s.role == SymbolRole::Definition),
                );
                if !defs.is_empty() {
                    println!(
                        "{}{} {}",
                        indent,
                        format!("{}:", kind_label(kind)).dimmed(),
                        defs.join(", ")
                    );
                }

                if options.show_references {
                    let refs = unique_names(
                        of_kind.iter().copied().filter(|s| s.role == SymbolRole::Reference),
                    );
                    if !refs.is_empty() {
                        println!(
                            "{}{} {}",
                            indent,
                            format!("{} (refs):", kind_label(kind)).dimmed(),
                            refs.join(", ")
                        );
                    }
                }
            }
        }
    }
    println!();
    Ok(())
}

fn group_by_scope(symbols: &[Symbol]) -> BTreeMap<String, Vec<&Symbol>> {
    let mut by_scope: BTreeMap<String, Vec<&Symbol>> = BTreeMap::new();
    for symbol in symbols {
        let scope = if symbol.scope.is_empty() {
            "global".to_string()
        } else {
            symbol.scope.clone()
        };
        by_scope.entry(scope).or_default().push(symbol);
    }
    by_scope
}

/// Global scope first, the rest in sorted order.
fn ordered_scopes<'a>(
    by_scope: &'a BTreeMap<String, Vec<&'a Symbol>>,
) -> Vec<(&'a str, &'a Vec<&'a Symbol>)> {
    let mut ordered: Vec<(&str, &Vec<&Symbol>)> = Vec::with_capacity(by_scope.len());
    if let Some(global) = by_scope.get("global") {
        ordered.push(("global", global));
    }
    for (scope, symbols) in by_scope {
        if scope != "global" {
            ordered.push((scope.as_str(), symbols));
        }
    }
    ordered
}

fn unique_names<'a>(symbols: impl Iterator<Item = &'a Symbol>) -> Vec<String> {
    let mut seen = Vec::new();
    for symbol in symbols {
        if !seen.contains(&symbol.name) {
            seen.push(symbol.name.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Language;

    fn symbol(name: &str, kind: SymbolKind, role: SymbolRole, scope: &str) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind,
            role,
            line: 0,
            column: 0,
            scope: scope.to_string(),
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn test_group_by_scope_defaults_empty_to_global() {
        let symbols = vec![
            symbol("a", SymbolKind::Function, SymbolRole::Definition, ""),
            symbol("b", SymbolKind::Method, SymbolRole::Definition, "class:X"),
        ];
        let grouped = group_by_scope(&symbols);
        assert!(grouped.contains_key("global"));
        assert!(grouped.contains_key("class:X"));
    }

    #[test]
    fn test_ordered_scopes_global_first() {
        let symbols = vec![
            symbol("m", SymbolKind::Method, SymbolRole::Definition, "class:A"),
            symbol("f", SymbolKind::Function, SymbolRole::Definition, "global"),
            symbol("n", SymbolKind::Method, SymbolRole::Definition, "class:B"),
        ];
        let grouped = group_by_scope(&symbols);
        let ordered = ordered_scopes(&grouped);
        let names: Vec<&str> = ordered.iter().map(|(s, _)| *s).collect();
        assert_eq!(names, vec!["global", "class:A", "class:B"]);
    }

    #[test]
    fn test_json_serialization_shape() {
        let analyses = vec![FileAnalysis {
            path: "a.ts".to_string(),
            language: Language::TypeScript,
            symbols: vec![symbol("f", SymbolKind::Function, SymbolRole::Definition, "global")],
        }];
        let json = serde_json::to_value(&analyses).unwrap();
        assert_eq!(json[0]["path"], "a.ts");
        assert_eq!(json[0]["language"], "typescript");
        assert_eq!(json[0]["symbols"][0]["kind"], "function");
        assert_eq!(json[0]["symbols"][0]["role"], "definition");
        // empty modifier sets are omitted from output
        assert!(json[0]["symbols"][0].get("modifiers").is_none());
    }
}
