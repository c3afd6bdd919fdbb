use super::{cut_at, is_identifier, is_member_identifier};
use crate::scanner::language::Language;

/// Constant names from a `const` declaration. Go block forms
/// (`const ( ... )`) yield every leading identifier, including iota-style
/// entries with no initializer.
pub fn constant_names(text: &str, lang: Language) -> Vec<String> {
    match lang {
        Language::Go => {
            let text = text.trim().strip_prefix("const ").unwrap_or(text).trim();
            go_declaration_names(text)
        }
        Language::TypeScript | Language::JavaScript => {
            let text = text.trim();
            let text = text.strip_prefix("export ").unwrap_or(text);
            match text.strip_prefix("const ") {
                Some(rest) => es_binding_name(rest).into_iter().collect(),
                None => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

/// Variable names from a `var`/`let` declaration.
pub fn var_names(text: &str, lang: Language) -> Vec<String> {
    match lang {
        Language::Go => {
            let text = text.trim().strip_prefix("var ").unwrap_or(text).trim();
            go_declaration_names(text)
        }
        Language::TypeScript | Language::JavaScript => {
            let text = text.trim();
            let text = text.strip_prefix("export ").unwrap_or(text);
            for keyword in ["let ", "var "] {
                if let Some(rest) = text.strip_prefix(keyword) {
                    return es_binding_name(rest).into_iter().collect();
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

/// Legacy `var x = 1, y = 2` declarations: comma-split at bracket depth
/// zero, one name per piece.
pub fn var_declaration_names(text: &str, _lang: Language) -> Vec<String> {
    let Some(rest) = text.trim().strip_prefix("var ") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in rest.char_indices() {
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth -= 1,
            ',' if depth == 0 => {
                if let Some(name) = single_var_name(&rest[start..idx]) {
                    names.push(name);
                }
                start = idx + 1;
            }
            _ => {}
        }
    }
    if start < rest.len() {
        if let Some(name) = single_var_name(&rest[start..]) {
            names.push(name);
        }
    }
    names
}

/// One binding from `name = value` or `name: Type = value`.
fn single_var_name(text: &str) -> Option<String> {
    let text = text.trim();
    if text.starts_with('{') || text.starts_with('[') {
        return None;
    }
    let name = match text.find(|c: char| matches!(c, ' ' | ':' | '=' | ';')) {
        Some(idx) => &text[..idx],
        None => text.trim_end_matches(';'),
    };
    let name = name.trim();
    is_member_identifier(name).then(|| name.to_string())
}

/// Leading identifiers of a Go `const`/`var` body, covering both the block
/// form (one entry per line, `Name = value`, `Name Type`, or bare `Name`)
/// and the single-declaration form.
fn go_declaration_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();

    if let Some(block) = text.strip_prefix('(') {
        let block = block.strip_suffix(')').unwrap_or(block);
        for line in block.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let head = match line.find('=') {
                Some(eq) => &line[..eq],
                None => line,
            };
            // Entries may list several names: `Red, Green Color = ...`
            for piece in head.split(',') {
                if let Some(name) = piece.trim().split_whitespace().next() {
                    if is_identifier(name) {
                        names.push(name.to_string());
                        break;
                    }
                }
            }
        }
    } else {
        let head = match text.find('=') {
            Some(eq) => &text[..eq],
            None => text,
        };
        if let Some(name) = head.trim().split_whitespace().next() {
            if is_identifier(name) {
                names.push(name.to_string());
            }
        }
    }

    names
}

/// First binding of an ECMAScript `const`/`let`/`var` head, rejecting
/// destructuring patterns.
fn es_binding_name(rest: &str) -> Option<String> {
    if rest.starts_with('{') || rest.starts_with('[') {
        return None;
    }
    let name = cut_at(rest, &[' ', ':', '=']).trim();
    is_member_identifier(name).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_const_block_with_iota() {
        let text = "const (\n\tRed = iota\n\tGreen\n\tBlue\n)";
        assert_eq!(constant_names(text, Language::Go), vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn test_go_const_single() {
        assert_eq!(
            constant_names("const MaxRetries = 3", Language::Go),
            vec!["MaxRetries"]
        );
        assert_eq!(
            constant_names("const Timeout time.Duration = time.Second", Language::Go),
            vec!["Timeout"]
        );
    }

    #[test]
    fn test_go_var_block() {
        let text = "var (\n\tdebug bool\n\tcount = 0\n\t// comment\n)";
        assert_eq!(var_names(text, Language::Go), vec!["debug", "count"]);
    }

    #[test]
    fn test_go_var_single_no_initializer() {
        assert_eq!(var_names("var registry map[string]int", Language::Go), vec!["registry"]);
    }

    #[test]
    fn test_es_const() {
        assert_eq!(
            constant_names("const limit: number = 10;", Language::TypeScript),
            vec!["limit"]
        );
        assert_eq!(
            constant_names("export const NAME = \"x\";", Language::JavaScript),
            vec!["NAME"]
        );
        // let is not a constant
        assert!(constant_names("let x = 1;", Language::TypeScript).is_empty());
    }

    #[test]
    fn test_es_destructuring_rejected() {
        assert!(constant_names("const { a, b } = obj;", Language::TypeScript).is_empty());
        assert!(var_names("let [x, y] = pair;", Language::TypeScript).is_empty());
    }

    #[test]
    fn test_es_var() {
        assert_eq!(var_names("var counter = 0;", Language::JavaScript), vec!["counter"]);
        assert_eq!(var_names("let name: string;", Language::TypeScript), vec!["name"]);
    }

    #[test]
    fn test_var_declaration_comma_split() {
        assert_eq!(
            var_declaration_names("var x = 1, y = 2", Language::JavaScript),
            vec!["x", "y"]
        );
        // commas inside call arguments don't split
        assert_eq!(
            var_declaration_names("var total = sum(a, b), label = \"n\"", Language::JavaScript),
            vec!["total", "label"]
        );
        assert_eq!(
            var_declaration_names("var { a, b } = obj, c = 1", Language::JavaScript),
            vec!["c"]
        );
    }

    #[test]
    fn test_empty_safe() {
        assert!(constant_names("", Language::Go).is_empty());
        assert!(var_names("", Language::TypeScript).is_empty());
        assert!(var_declaration_names("not a var", Language::JavaScript).is_empty());
    }
}
