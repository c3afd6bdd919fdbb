//! Text-driven name extraction.
//!
//! The matcher already localized the interesting span; these functions
//! normalize the raw fragment into identifier names. All of them tolerate
//! leading/trailing whitespace and return `None` (or an empty list) for
//! malformed input rather than panicking.

mod declarations;
mod functions;
mod imports;
mod members;
mod references;
mod variables;

pub use declarations::{
    ambient_declarations, class_name, enum_name, interface_name, namespace_name, type_name,
};
pub use functions::{
    arrow_function_name, function_expression_name, function_name, function_signature_name,
    generator_function_name,
};
pub use imports::{decorator_name, import_alias_name, import_path};
pub use members::{
    call_signature, construct_signature, field_name, go_receiver_type, index_signature,
    method_name, method_signature_name, property_signature_name,
};
pub use references::{call_expression_name, new_expression_name, type_reference_name};
pub use variables::{constant_names, var_declaration_names, var_names};

use super::language::Language;

/// Modifier keywords recognized on ECMAScript declarations.
pub const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "static", "readonly", "async", "abstract", "override",
    "export", "default",
];

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_identifier(s: &str) -> bool {
    identifier_ok(s, false)
}

/// Like [`is_identifier`] but admits a leading `#` (ECMAScript private
/// member names).
pub(crate) fn is_member_identifier(s: &str) -> bool {
    identifier_ok(s, true)
}

fn identifier_ok(s: &str, allow_hash: bool) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let first_ok =
        first.is_ascii_alphabetic() || first == '_' || (allow_hash && first == '#');
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Prefix of `text` up to (excluding) the first of `delims`, or the whole
/// string when none occurs.
pub(crate) fn cut_at<'a>(text: &'a str, delims: &[char]) -> &'a str {
    match text.find(|c| delims.contains(&c)) {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Repeatedly strip any of `prefixes` (each expected to end in a space)
/// from the front of `text`.
pub(crate) fn strip_any_loop<'a>(mut text: &'a str, prefixes: &[&str]) -> &'a str {
    loop {
        let mut stripped = false;
        for prefix in prefixes {
            if let Some(rest) = text.strip_prefix(prefix) {
                text = rest;
                stripped = true;
            }
        }
        if !stripped {
            return text;
        }
    }
}

/// Drop leading decorator lines (`@Name` or `@Name(args)`, one per line).
pub(crate) fn strip_decorator_lines(mut text: &str) -> &str {
    while text.starts_with('@') {
        match text.find('\n') {
            Some(newline) => text = text[newline + 1..].trim_start(),
            None => break,
        }
    }
    text
}

/// Modifier keywords present on a declaration, in source order.
///
/// Only the first line is inspected, cut at the first unmatched `{`, so
/// keywords inside bodies or balanced argument lists don't leak in.
pub fn modifiers(text: &str, lang: Language) -> Vec<String> {
    if !lang.is_ecmascript() {
        return Vec::new();
    }

    let first_line = text.trim_start().lines().next().unwrap_or("");
    let head = before_unmatched_brace(first_line);

    let mut found = Vec::new();
    for token in head.split_whitespace() {
        if MODIFIERS.contains(&token) && !found.iter().any(|f| f == token) {
            found.push(token.to_string());
        }
    }
    found
}

/// Prefix of `line` before the first `{` that is never closed on the line.
fn before_unmatched_brace(line: &str) -> &str {
    let mut depth = 0usize;
    let mut open_idx = None;
    for (idx, c) in line.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    open_idx = Some(idx);
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    open_idx = None;
                }
            }
            _ => {}
        }
    }
    match (depth, open_idx) {
        (d, Some(idx)) if d > 0 => &line[..idx],
        _ => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_bar"));
        assert!(is_identifier("Baz123"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("foo-bar"));
        assert!(!is_identifier("#secret"));
        assert!(is_member_identifier("#secret"));
        assert!(!is_member_identifier("##x"));
    }

    #[test]
    fn test_cut_at() {
        assert_eq!(cut_at("name(x)", &['(', '<']), "name");
        assert_eq!(cut_at("Name<T>", &['(', '<']), "Name");
        assert_eq!(cut_at("plain", &['(', '<']), "plain");
    }

    #[test]
    fn test_strip_any_loop() {
        assert_eq!(
            strip_any_loop("public static async run", &["public ", "static ", "async "]),
            "run"
        );
        assert_eq!(strip_any_loop("run", &["public "]), "run");
    }

    #[test]
    fn test_modifiers_source_order() {
        let mods = modifiers(
            "export const fetchUser = async (id: string) => { return id; };",
            Language::TypeScript,
        );
        assert_eq!(mods, vec!["export", "async"]);
    }

    #[test]
    fn test_modifiers_stop_at_body() {
        // "static" inside the body must not be reported.
        let mods = modifiers(
            "private run() { static_helper(); }\n",
            Language::TypeScript,
        );
        assert_eq!(mods, vec!["private"]);
    }

    #[test]
    fn test_modifiers_ignore_balanced_braces() {
        let mods = modifiers(
            "@Component({selector: 'app'}) class DecoratedClass {",
            Language::TypeScript,
        );
        assert!(mods.is_empty());
    }

    #[test]
    fn test_modifiers_non_ecmascript() {
        assert!(modifiers("export async fn main()", Language::Go).is_empty());
    }
}
