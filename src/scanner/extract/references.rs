use super::{cut_at, is_identifier, is_member_identifier};

/// Callee name from a call expression: `obj.method(x)` -> `method`,
/// `maybe?.run()` -> `run`.
pub fn call_expression_name(text: &str) -> Option<String> {
    let text = text.trim();
    let paren = text.find('(')?;
    let mut name = text[..paren].trim();
    if let Some(dot) = name.rfind('.') {
        name = &name[dot + 1..];
    }
    if let Some(q) = name.rfind('?') {
        name = &name[q + 1..];
    }
    is_member_identifier(name).then(|| name.to_string())
}

/// Class name from a `new` expression: `new Server<T>(cfg)` -> `Server`.
pub fn new_expression_name(text: &str) -> Option<String> {
    let rest = text.trim().strip_prefix("new ")?;
    let name = cut_at(rest, &['(', '<', ' ']).trim();
    is_identifier(name).then(|| name.to_string())
}

/// Type name from a type reference: `Map<string, V>` -> `Map`,
/// `Ns.Inner` -> `Inner`.
pub fn type_reference_name(text: &str) -> Option<String> {
    let mut text = text.trim();
    if let Some(bracket) = text.find('<') {
        if bracket > 0 {
            text = &text[..bracket];
        }
    }
    if let Some(dot) = text.rfind('.') {
        text = &text[dot + 1..];
    }
    is_identifier(text).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_expression() {
        assert_eq!(call_expression_name("foo()"), Some("foo".into()));
        assert_eq!(call_expression_name("this.service.load(id)"), Some("load".into()));
        assert_eq!(call_expression_name("maybe?.run()"), Some("run".into()));
        assert_eq!(call_expression_name("(fn)()"), None);
        assert_eq!(call_expression_name("no parens"), None);
    }

    #[test]
    fn test_new_expression() {
        assert_eq!(new_expression_name("new B()"), Some("B".into()));
        assert_eq!(new_expression_name("new Map<string, V>()"), Some("Map".into()));
        assert_eq!(new_expression_name("renew()"), None);
    }

    #[test]
    fn test_type_reference() {
        assert_eq!(type_reference_name("Array<T>"), Some("Array".into()));
        assert_eq!(type_reference_name("Namespace.Type"), Some("Type".into()));
        assert_eq!(type_reference_name("Plain"), Some("Plain".into()));
        assert_eq!(type_reference_name("{ inline: true }"), None);
    }
}
