use super::{is_identifier, is_member_identifier, strip_any_loop};
use crate::scanner::language::Language;

/// Method name from a Go method declaration or an ECMAScript method
/// definition (including getters/setters, generators, and computed keys).
pub fn method_name(text: &str, lang: Language) -> Option<String> {
    match lang {
        Language::Go => {
            let rest = text.strip_prefix("func ")?;
            let rest = if rest.starts_with('(') {
                let close = rest.find(')')?;
                rest[close + 1..].trim_start()
            } else {
                rest
            };
            let paren = rest.find('(')?;
            let name = rest[..paren].trim();
            is_identifier(name).then(|| name.to_string())
        }
        Language::TypeScript | Language::JavaScript => {
            let mut text = text.trim();
            // Decorated methods: drop the decorator lines first.
            while text.starts_with('@') {
                match text.find('\n') {
                    Some(newline) => text = text[newline + 1..].trim_start(),
                    None => break,
                }
            }
            let text = strip_any_loop(
                text,
                &[
                    "public ", "private ", "protected ", "static ", "readonly ", "async ",
                    "override ", "abstract ",
                ],
            );
            let text = text.strip_prefix("get ").unwrap_or(text);
            let text = text.strip_prefix("set ").unwrap_or(text);
            let text = text.strip_prefix('*').unwrap_or(text).trim_start();

            // Computed keys: [expr]() or ["literal"]() keep the bracketed form.
            if let Some(rest) = text.strip_prefix('[') {
                let close = rest.find(']')?;
                let inner = rest[..close].trim_matches(|c| c == '"' || c == '\'' || c == '`');
                return (!inner.is_empty()).then(|| format!("[{inner}]"));
            }

            let end = text.find(|c| c == '(' || c == '<')?;
            let name = text[..end].trim();
            is_member_identifier(name).then(|| name.to_string())
        }
        _ => None,
    }
}

/// Interface method signature: `name(): Type;` or `abstract name(): Type;`.
pub fn method_signature_name(text: &str, lang: Language) -> Option<String> {
    if lang != Language::TypeScript {
        return None;
    }
    let text = text.trim();
    let text = text.strip_prefix("abstract ").unwrap_or(text);
    let end = text.find(|c| c == '(' || c == '<' || c == '?')?;
    let name = text[..end].trim();
    is_member_identifier(name).then(|| name.to_string())
}

/// Interface property signature: `name: Type;` or `name?: Type;`.
pub fn property_signature_name(text: &str, lang: Language) -> Option<String> {
    if lang != Language::TypeScript {
        return None;
    }
    let text = text.trim();
    let text = text.strip_prefix("readonly ").unwrap_or(text);
    let end = text.find(|c| c == ':' || c == '?' || c == ' ' || c == '\t')?;
    let name = text[..end].trim();
    is_member_identifier(name).then(|| name.to_string())
}

/// Class field definition: `[modifiers] name: Type = value;`, possibly
/// decorated (`@Input() name = ...`).
pub fn field_name(text: &str, lang: Language) -> Option<String> {
    if !lang.is_ecmascript() {
        return None;
    }
    let mut text = text.trim();

    // Decorators on fields are usually inline: skip past `@Name(...)` (or a
    // bare `@name `), then any further ones.
    while text.starts_with('@') {
        if let Some(paren) = text.find(')') {
            text = text[paren + 1..].trim_start();
        } else if let Some(newline) = text.find('\n') {
            text = text[newline + 1..].trim_start();
        } else if let Some(space) = text.find(' ') {
            text = text[space + 1..].trim_start();
        } else {
            return None;
        }
    }

    let text = strip_any_loop(
        text,
        &[
            "public ", "private ", "protected ", "static ", "readonly ", "abstract ",
            "override ", "declare ",
        ],
    );

    let end = text.find(|c: char| matches!(c, ':' | '=' | '!' | ' ' | '\t' | ';'))?;
    let name = text[..end].trim();
    is_member_identifier(name).then(|| name.to_string())
}

/// Call signature in an interface body: `(): T` -> the canonical `()`.
pub fn call_signature(text: &str) -> Option<String> {
    text.trim().starts_with('(').then(|| "()".to_string())
}

/// Construct signature: `new(): T` -> the canonical `new()`.
pub fn construct_signature(text: &str) -> Option<String> {
    let text = text.trim();
    (text.starts_with("new(") || text.starts_with("new ("))
        .then(|| "new()".to_string())
}

/// Index signature: `[key: string]: number` -> `[string]` (the key type).
pub fn index_signature(text: &str) -> Option<String> {
    let text = text.trim();
    if !text.starts_with('[') {
        return None;
    }
    let colon = text.find(':')?;
    let close = text.find(']')?;
    if close < colon {
        return None;
    }
    let key_type = text[colon + 1..close].trim();
    (!key_type.is_empty()).then(|| format!("[{key_type}]"))
}

/// Receiver type of a Go method: `func (m *MyStruct) Method()` -> `MyStruct`.
pub fn go_receiver_type(text: &str) -> Option<String> {
    let rest = text.trim().strip_prefix("func ")?;
    let rest = rest.strip_prefix('(')?;
    let close = rest.find(')')?;
    let receiver = &rest[..close];
    let type_name = receiver.split_whitespace().last()?;
    let type_name = type_name.trim_start_matches('*');
    is_identifier(type_name).then(|| type_name.to_string())
}
