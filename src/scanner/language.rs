use std::fmt;
use std::path::Path;

/// Languages the rule bundle knows how to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Go,
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Java,
    Ruby,
    Swift,
    Kotlin,
    C,
    Cpp,
    Bash,
}

impl Language {
    /// Resolve a language from the leading segment of a rule id
    /// (e.g. "ts-arrow-functions" -> TypeScript).
    pub fn from_rule_id(rule_id: &str) -> Option<Self> {
        let prefix = rule_id.split('-').next()?;
        match prefix {
            "go" => Some(Language::Go),
            "ts" => Some(Language::TypeScript),
            "js" => Some(Language::JavaScript),
            "py" => Some(Language::Python),
            "rust" => Some(Language::Rust),
            "java" => Some(Language::Java),
            "ruby" => Some(Language::Ruby),
            "swift" => Some(Language::Swift),
            "kotlin" => Some(Language::Kotlin),
            "c" => Some(Language::C),
            "cpp" => Some(Language::Cpp),
            "bash" => Some(Language::Bash),
            _ => None,
        }
    }

    /// Detect language from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "go" => Some(Language::Go),
            "ts" | "tsx" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" => Some(Language::JavaScript),
            "py" | "pyi" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "java" => Some(Language::Java),
            "rb" => Some(Language::Ruby),
            "swift" => Some(Language::Swift),
            "kt" | "kts" => Some(Language::Kotlin),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" => Some(Language::Cpp),
            "sh" | "bash" => Some(Language::Bash),
            _ => None,
        }
    }

    /// Stable lowercase tag used in serialized output.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Bash => "bash",
        }
    }

    /// Compact display label for renderers.
    pub fn short_label(&self) -> &'static str {
        match self {
            Language::Go => "Go",
            Language::TypeScript => "TS",
            Language::JavaScript => "JS",
            Language::Python => "Py",
            Language::Rust => "Rs",
            Language::Java => "Java",
            Language::Ruby => "Rb",
            Language::Swift => "Swift",
            Language::Kotlin => "Kt",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Bash => "Sh",
        }
    }

    /// TypeScript and JavaScript share grammar-level extraction rules.
    pub fn is_ecmascript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::JavaScript)
    }

    /// Languages whose declarations admit modifier prefixes and brace scopes.
    pub fn is_curly_brace(&self) -> bool {
        !matches!(self, Language::Python)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl serde::Serialize for Language {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rule_id() {
        assert_eq!(Language::from_rule_id("go-methods"), Some(Language::Go));
        assert_eq!(
            Language::from_rule_id("ts-arrow-functions"),
            Some(Language::TypeScript)
        );
        assert_eq!(
            Language::from_rule_id("py-ref-function-calls"),
            Some(Language::Python)
        );
        assert_eq!(Language::from_rule_id("fortran-functions"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path(Path::new("main.go")), Some(Language::Go));
        assert_eq!(
            Language::from_path(Path::new("App.tsx")),
            Some(Language::TypeScript)
        );
        assert_eq!(Language::from_path(Path::new("util.hpp")), Some(Language::Cpp));
        assert_eq!(Language::from_path(Path::new("README.md")), None);
        assert_eq!(Language::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_families() {
        assert!(Language::TypeScript.is_ecmascript());
        assert!(Language::JavaScript.is_ecmascript());
        assert!(!Language::Go.is_ecmascript());
        assert!(Language::Rust.is_curly_brace());
        assert!(!Language::Python.is_curly_brace());
    }
}
