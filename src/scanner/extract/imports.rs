use super::{cut_at, is_identifier};
use crate::scanner::language::Language;

/// Extract the imported module/path from an import-like statement.
///
/// Callers prefer the matcher's `PATH` meta-variable; this is the
/// per-language text fallback.
pub fn import_path(text: &str, lang: Language) -> Option<String> {
    let text = text.trim();

    match lang {
        Language::C | Language::Cpp => {
            // #include <header> or #include "header"
            if let Some(start) = text.find('<') {
                if let Some(len) = text[start + 1..].find('>') {
                    return non_empty(&text[start + 1..start + 1 + len]);
                }
            }
            first_quoted(text)
        }
        Language::Bash => {
            // source ./file or . ./file
            if text.starts_with("source ") || text.starts_with(". ") {
                return text.split_whitespace().nth(1).and_then(non_empty);
            }
            None
        }
        Language::Rust => {
            // use foo::bar::Baz; -> foo
            let rest = text.strip_prefix("use ")?;
            let rest = rest.trim_end().trim_end_matches(';');
            let root = match rest.find("::") {
                Some(idx) => &rest[..idx],
                None => rest,
            };
            non_empty(root.trim())
        }
        Language::Java => {
            // import foo.bar.Baz; -> foo.bar
            let rest = text.strip_prefix("import ")?;
            let rest = rest.trim().trim_end_matches(';').trim();
            match rest.rfind('.') {
                Some(idx) if idx > 0 => non_empty(&rest[..idx]),
                _ => non_empty(rest),
            }
        }
        _ => {
            // Quoted module specifier (Go, TS/JS, Ruby), else the second
            // token of an `import foo` / `from foo import bar` form.
            if let Some(quoted) = first_quoted(text) {
                return Some(quoted);
            }
            if text.starts_with("import ") || text.starts_with("from ") {
                return text.split_whitespace().nth(1).and_then(non_empty);
            }
            None
        }
    }
}

/// `import X = require('mod')` -> `mod`; `import X = Ns.Member` -> `Ns`.
pub fn import_alias_name(text: &str, lang: Language) -> Option<String> {
    if lang != Language::TypeScript {
        return None;
    }
    let text = text.trim();

    if let Some(idx) = text.find("require(") {
        return first_quoted(&text[idx + "require(".len()..]);
    }

    let text = text.strip_prefix("import ").unwrap_or(text);
    let eq = text.find('=')?;
    let rhs = text[eq + 1..].trim().trim_end_matches(';').trim();
    let root = match rhs.find('.') {
        Some(idx) if idx > 0 => &rhs[..idx],
        _ => rhs,
    };
    non_empty(root)
}

/// `@DecoratorName` or `@DecoratorName(args)` -> `DecoratorName`.
pub fn decorator_name(text: &str, lang: Language) -> Option<String> {
    if !lang.is_ecmascript() {
        return None;
    }
    let rest = text.trim().strip_prefix('@')?;
    let name = cut_at(rest, &['(', '\n', ' ', '\t']).trim();
    is_identifier(name).then(|| name.to_string())
}

fn first_quoted(text: &str) -> Option<String> {
    for quote in ['"', '\'', '`'] {
        if let Some(start) = text.find(quote) {
            if let Some(len) = text[start + 1..].find(quote) {
                if len > 0 {
                    return Some(text[start + 1..start + 1 + len].to_string());
                }
            }
        }
    }
    None
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_include() {
        assert_eq!(
            import_path("#include <stdio.h>", Language::C),
            Some("stdio.h".into())
        );
        assert_eq!(
            import_path("#include \"local.h\"", Language::Cpp),
            Some("local.h".into())
        );
    }

    #[test]
    fn test_bash_source() {
        assert_eq!(
            import_path("source ./lib.sh", Language::Bash),
            Some("./lib.sh".into())
        );
        assert_eq!(import_path(". ./env.sh", Language::Bash), Some("./env.sh".into()));
        assert_eq!(import_path("echo hi", Language::Bash), None);
    }

    #[test]
    fn test_rust_use_root_module() {
        assert_eq!(
            import_path("use serde::Deserialize;", Language::Rust),
            Some("serde".into())
        );
        assert_eq!(import_path("use anyhow;", Language::Rust), Some("anyhow".into()));
    }

    #[test]
    fn test_java_import_package() {
        assert_eq!(
            import_path("import java.util.List;", Language::Java),
            Some("java.util".into())
        );
    }

    #[test]
    fn test_quoted_specifiers() {
        assert_eq!(import_path("\"fmt\"", Language::Go), Some("fmt".into()));
        assert_eq!(
            import_path("import { x } from './utils'", Language::TypeScript),
            Some("./utils".into())
        );
    }

    #[test]
    fn test_python_forms() {
        assert_eq!(import_path("import os", Language::Python), Some("os".into()));
        assert_eq!(
            import_path("from pathlib import Path", Language::Python),
            Some("pathlib".into())
        );
    }

    #[test]
    fn test_import_alias() {
        assert_eq!(
            import_alias_name("import fs = require('fs')", Language::TypeScript),
            Some("fs".into())
        );
        assert_eq!(
            import_alias_name("import Inner = Outer.Inner;", Language::TypeScript),
            Some("Outer".into())
        );
        assert_eq!(import_alias_name("import x = y", Language::Go), None);
    }

    #[test]
    fn test_decorator_name() {
        assert_eq!(
            decorator_name("@Component({selector: 'app'})", Language::TypeScript),
            Some("Component".into())
        );
        assert_eq!(
            decorator_name("@Injectable", Language::TypeScript),
            Some("Injectable".into())
        );
        assert_eq!(decorator_name("not a decorator", Language::TypeScript), None);
    }

    #[test]
    fn test_malformed_is_empty_safe() {
        assert_eq!(import_path("", Language::Go), None);
        assert_eq!(import_path("   ", Language::TypeScript), None);
        assert_eq!(import_path("use", Language::Rust), None);
    }
}
