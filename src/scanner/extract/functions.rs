use super::{cut_at, is_identifier, is_member_identifier};
use crate::scanner::language::Language;

/// Keywords that would otherwise look like method names in ECMAScript
/// (`if (...)` inside a class body matches the method shape).
const CONTROL_FLOW: &[&str] = &["if", "for", "while", "switch", "catch"];

/// Extract a function name from a function declaration fragment.
pub fn function_name(text: &str, lang: Language) -> Option<String> {
    let text = text.trim();

    match lang {
        Language::Go => {
            // func Name(...) or func (r Receiver) Name(...)
            let mut rest = text.strip_prefix("func ")?;
            if rest.starts_with('(') {
                let close = rest.find(')')?;
                rest = rest[close + 1..].trim_start();
            }
            let paren = rest.find('(')?;
            // generic functions carry a [T any] parameter list
            valid(cut_at(&rest[..paren], &['[']))
        }

        Language::TypeScript | Language::JavaScript => {
            // function name(...) possibly prefixed with async/export
            if let Some(idx) = text.find("function ") {
                let rest = &text[idx + "function ".len()..];
                let paren = rest.find('(')?;
                return valid_member(rest[..paren].trim());
            }
            // Method shape: [modifiers] name(...) or get/set name(...)
            let paren = text.find('(')?;
            let head = text[..paren].trim();
            let name = strip_es_modifier_words(head);
            if name.is_empty() || CONTROL_FLOW.contains(&name) {
                return None;
            }
            valid_member(name)
        }

        Language::Python => {
            let rest = text.strip_prefix("def ")?;
            let paren = rest.find('(')?;
            valid(&rest[..paren])
        }

        Language::Rust => {
            // fn name(...) with optional visibility prefix and generics
            let idx = text.find("fn ")?;
            let rest = &text[idx + 3..];
            let paren = rest.find('(')?;
            valid(cut_at(&rest[..paren], &['<']))
        }

        Language::Java => {
            // last word before the parameter list
            let paren = text.find('(')?;
            let head = text[..paren].trim();
            valid(head.split_whitespace().last()?)
        }

        Language::Ruby => {
            let rest = text.strip_prefix("def ")?;
            if let Some(paren) = rest.find('(') {
                return valid(&rest[..paren]);
            }
            valid(cut_at(rest, &[' ', '\n']))
        }

        Language::Swift | Language::Kotlin => {
            for keyword in ["func ", "fun "] {
                if let Some(idx) = text.find(keyword) {
                    let rest = &text[idx + keyword.len()..];
                    if let Some(paren) = rest.find('(') {
                        return valid(cut_at(rest[..paren].trim(), &['<']));
                    }
                }
            }
            None
        }

        Language::C | Language::Cpp => {
            // return_type name(...) with possible pointer decoration
            let paren = text.find('(')?;
            let head = text[..paren].trim().trim_start_matches('*');
            let last = head.split_whitespace().last()?;
            valid(last.trim_start_matches('*'))
        }

        Language::Bash => {
            let rest = text.strip_prefix("function ").unwrap_or(text);
            let paren = rest.find('(')?;
            valid(rest[..paren].trim())
        }
    }
}

/// Arrow function binding name, read from the full source line rather than
/// the matched span (`const name = () => {}` - the span starts at the arrow
/// function itself).
pub fn arrow_function_name(lines: &str, lang: Language) -> Option<String> {
    if !lang.is_ecmascript() {
        return None;
    }
    let line = lines.trim();
    let line = line.strip_prefix("export ").unwrap_or(line);
    for keyword in ["const ", "let ", "var "] {
        if let Some(rest) = line.strip_prefix(keyword) {
            let name = cut_at(rest, &[' ', ':', '=']).trim();
            return valid_member(name);
        }
    }
    None
}

/// Ambient declaration: `function name(...): Type;` with no body.
pub fn function_signature_name(text: &str, lang: Language) -> Option<String> {
    if lang != Language::TypeScript {
        return None;
    }
    let rest = text.trim().strip_prefix("function ")?;
    valid_member(cut_at(rest, &['(', '<']).trim())
}

/// `function* name()` or `async function *name()`.
pub fn generator_function_name(text: &str, lang: Language) -> Option<String> {
    if !lang.is_ecmascript() {
        return None;
    }
    let text = text.trim();
    let text = text.strip_prefix("export ").unwrap_or(text);
    let text = text.strip_prefix("async ").unwrap_or(text);
    if !text.starts_with("function*") && !text.starts_with("function *") {
        return None;
    }
    let star = text.find('*')?;
    let rest = text[star + 1..].trim_start();
    valid_member(cut_at(rest, &['(', '<']).trim())
}

/// Named function expression: `function myFunc() {}` -> `myFunc`, or `None`
/// for anonymous forms.
pub fn function_expression_name(text: &str, lang: Language) -> Option<String> {
    if !lang.is_ecmascript() {
        return None;
    }
    let text = text.trim();
    let text = text.strip_prefix("async ").unwrap_or(text);
    let rest = text.strip_prefix("function")?;
    let rest = rest.strip_prefix('*').unwrap_or(rest).trim_start();
    if rest.starts_with('(') {
        return None;
    }
    let paren = rest.find(|c| c == '(' || c == '<')?;
    valid_member(rest[..paren].trim())
}

fn strip_es_modifier_words(mut head: &str) -> &str {
    loop {
        let mut stripped = false;
        for word in [
            "public ", "private ", "protected ", "static ", "readonly ", "async ", "get ",
            "set ", "override ",
        ] {
            if let Some(rest) = head.strip_prefix(word) {
                head = rest.trim_start();
                stripped = true;
            }
        }
        if !stripped {
            return head;
        }
    }
}

fn valid(name: &str) -> Option<String> {
    let name = name.trim();
    is_identifier(name).then(|| name.to_string())
}

fn valid_member(name: &str) -> Option<String> {
    let name = name.trim();
    is_member_identifier(name).then(|| name.to_string())
}
