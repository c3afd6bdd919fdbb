use super::{cut_at, is_identifier, strip_decorator_lines};
use crate::scanner::language::Language;
use crate::scanner::symbols::SymbolKind;

/// Class (or Go struct) declaration name.
pub fn class_name(text: &str, lang: Language) -> Option<String> {
    match lang {
        Language::Go => go_type_head(text),
        Language::TypeScript | Language::JavaScript => {
            let text = strip_decorator_lines(text.trim());
            let text = text.strip_prefix("export ").unwrap_or(text);
            let text = text.strip_prefix("default ").unwrap_or(text);
            let text = text.strip_prefix("declare ").unwrap_or(text);
            let text = text.strip_prefix("abstract ").unwrap_or(text);
            let rest = text.strip_prefix("class ")?;
            valid(cut_at(rest, &[' ', '<', '{', '\n']))
        }
        _ => None,
    }
}

/// Interface declaration name (Go `type X interface` or TS `interface X`).
pub fn interface_name(text: &str, lang: Language) -> Option<String> {
    match lang {
        Language::Go => go_type_head(text),
        Language::TypeScript => {
            let text = text.trim();
            let text = text.strip_prefix("export ").unwrap_or(text);
            let text = text.strip_prefix("declare ").unwrap_or(text);
            let rest = text.strip_prefix("interface ")?;
            valid(cut_at(rest, &[' ', '<', '{', '\n']))
        }
        _ => None,
    }
}

/// Type alias name. Go aliases reuse the `type NAME ...` head; TypeScript
/// uses `type Name = ...`.
pub fn type_name(text: &str, lang: Language) -> Option<String> {
    match lang {
        Language::Go => go_type_head(text),
        Language::TypeScript => {
            let text = text.trim();
            let text = text.strip_prefix("export ").unwrap_or(text);
            let text = text.strip_prefix("declare ").unwrap_or(text);
            let rest = text.strip_prefix("type ")?;
            valid(cut_at(rest, &[' ', '<', '=']))
        }
        _ => None,
    }
}

/// Enum declaration name, tolerating `export`/`const`/`declare` prefixes.
pub fn enum_name(text: &str, lang: Language) -> Option<String> {
    if lang != Language::TypeScript {
        return None;
    }
    let text = text.trim();
    let text = text.strip_prefix("export ").unwrap_or(text);
    let text = text.strip_prefix("declare ").unwrap_or(text);
    let text = text.strip_prefix("const ").unwrap_or(text);
    let rest = text.strip_prefix("enum ")?;
    valid(cut_at(rest, &[' ', '{', '\n']))
}

/// `namespace Name { ... }` or `module Name { ... }`. Quoted module names
/// (`declare module "foo"`) are not identifiers and yield nothing.
pub fn namespace_name(text: &str, lang: Language) -> Option<String> {
    if lang != Language::TypeScript {
        return None;
    }
    let text = text.trim();
    let text = text.strip_prefix("export ").unwrap_or(text);
    let text = text.strip_prefix("declare ").unwrap_or(text);
    for keyword in ["namespace ", "module "] {
        if let Some(rest) = text.strip_prefix(keyword) {
            if rest.starts_with('"') || rest.starts_with('\'') {
                return None;
            }
            return valid(cut_at(rest, &[' ', '{', '\n']));
        }
    }
    None
}

/// Parse a TypeScript ambient declaration (`declare ...`) into the symbols
/// it introduces.
pub fn ambient_declarations(text: &str, lang: Language) -> Vec<(String, SymbolKind)> {
    if lang != Language::TypeScript {
        return Vec::new();
    }
    let Some(rest) = text.trim().strip_prefix("declare ") else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut push = |name: Option<String>, kind: SymbolKind| {
        if let Some(name) = name {
            out.push((name, kind));
        }
    };

    if let Some(body) = rest.strip_prefix("function ") {
        push(valid(cut_at(body, &['(', '<'])), SymbolKind::Function);
    } else if let Some(body) = rest.strip_prefix("const ") {
        push(valid(cut_at(body, &[':', '=', ';', ' '])), SymbolKind::Constant);
    } else if let Some(body) = rest.strip_prefix("let ").or_else(|| rest.strip_prefix("var ")) {
        push(valid(cut_at(body, &[':', '=', ';', ' '])), SymbolKind::Variable);
    } else if let Some(body) = rest
        .strip_prefix("class ")
        .or_else(|| rest.strip_prefix("abstract class "))
    {
        push(valid(cut_at(body, &[' ', '<', '{', '\n'])), SymbolKind::Class);
    } else if let Some(body) = rest.strip_prefix("interface ") {
        push(valid(cut_at(body, &[' ', '<', '{', '\n'])), SymbolKind::Interface);
    } else if let Some(body) = rest
        .strip_prefix("namespace ")
        .or_else(|| rest.strip_prefix("module "))
    {
        if !body.starts_with('"') && !body.starts_with('\'') {
            push(valid(cut_at(body, &[' ', '{', '\n'])), SymbolKind::Namespace);
        }
    } else if let Some(body) = rest.strip_prefix("enum ") {
        push(valid(cut_at(body, &[' ', '{', '\n'])), SymbolKind::Enum);
    } else if let Some(body) = rest.strip_prefix("type ") {
        push(valid(cut_at(body, &[' ', '<', '='])), SymbolKind::Type);
    }

    out
}

/// `type NAME struct/interface/...` -> `NAME`.
fn go_type_head(text: &str) -> Option<String> {
    let idx = text.find("type ")?;
    let rest = &text[idx + "type ".len()..];
    valid(cut_at(rest, &[' ', '\t']))
}

fn valid(name: &str) -> Option<String> {
    let name = name.trim();
    is_identifier(name).then(|| name.to_string())
}
