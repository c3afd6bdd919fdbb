//! End-to-end scans against a real ast-grep binary. Every test skips when
//! the matcher is not installed.

use std::fs;

use cartograph::scanner::{FileAnalysis, ScanError, SymbolKind, SymbolRole, SymbolScanner};
use tempfile::TempDir;

fn scanner_or_skip() -> Option<SymbolScanner> {
    match SymbolScanner::new() {
        Ok(scanner) => Some(scanner),
        Err(ScanError::MatcherUnavailable { .. }) => {
            eprintln!("skipping: ast-grep (sg) not installed");
            None
        }
        Err(err) => panic!("scanner construction failed: {err}"),
    }
}

fn analysis_for<'a>(analyses: &'a [FileAnalysis], path: &str) -> &'a FileAnalysis {
    analyses
        .iter()
        .find(|a| a.path == path)
        .unwrap_or_else(|| panic!("no analysis for {path}, got {:?}", paths(analyses)))
}

fn paths(analyses: &[FileAnalysis]) -> Vec<&str> {
    analyses.iter().map(|a| a.path.as_str()).collect()
}

#[test]
fn test_go_methods_resolve_receiver_scope() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("main.go"),
        r#"package main

type MyStruct struct {
	Field string
}

func (m *MyStruct) Method1() {}

func (m MyStruct) Method2() string { return "" }

func standalone() {}
"#,
    )
    .unwrap();

    let analyses = scanner.scan(dir.path(), false).unwrap();
    let a = analysis_for(&analyses, "main.go");

    let method1 = a.symbols.iter().find(|s| s.name == "Method1").expect("Method1");
    assert_eq!(method1.kind, SymbolKind::Method);
    assert_eq!(method1.scope, "struct:MyStruct");

    let method2 = a.symbols.iter().find(|s| s.name == "Method2").expect("Method2");
    assert_eq!(method2.kind, SymbolKind::Method);
    assert_eq!(method2.scope, "struct:MyStruct");

    let standalone = a.symbols.iter().find(|s| s.name == "standalone").expect("standalone");
    assert_eq!(standalone.kind, SymbolKind::Function);
    assert_eq!(standalone.scope, "global");
}

#[test]
fn test_go_imports_and_const_block() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("colors.go"),
        r#"package colors

import (
	"fmt"
	"os"
)

const (
	Red = iota
	Green
	Blue
)

func show() {
	fmt.Fprintln(os.Stdout, Red)
}
"#,
    )
    .unwrap();

    let analyses = scanner.scan(dir.path(), false).unwrap();
    let a = analysis_for(&analyses, "colors.go");

    let imports: Vec<&str> = a
        .symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Import)
        .map(|s| s.name.as_str())
        .collect();
    assert!(imports.contains(&"fmt"), "imports: {imports:?}");
    assert!(imports.contains(&"os"), "imports: {imports:?}");

    let constants: Vec<&str> = a
        .symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Constant)
        .map(|s| s.name.as_str())
        .collect();
    for expected in ["Red", "Green", "Blue"] {
        assert!(constants.contains(&expected), "constants: {constants:?}");
    }
    assert!(a
        .symbols
        .iter()
        .filter(|s| s.kind == SymbolKind::Constant)
        .all(|s| s.scope == "global"));
}

#[test]
fn test_typescript_class_members_and_scope() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("service.ts"),
        r#"export class UserService {
  private cache: string = "";

  lookup(id: string): string {
    return this.cache + id;
  }
}
"#,
    )
    .unwrap();

    let analyses = scanner.scan(dir.path(), false).unwrap();
    let a = analysis_for(&analyses, "service.ts");

    let class = a.symbols.iter().find(|s| s.name == "UserService").expect("class");
    assert_eq!(class.kind, SymbolKind::Class);
    assert_eq!(class.scope, "global");
    assert!(class.modifiers.contains(&"export".to_string()));

    let field = a.symbols.iter().find(|s| s.name == "cache").expect("field");
    assert_eq!(field.kind, SymbolKind::Field);
    assert_eq!(field.scope, "class:UserService");

    let method = a.symbols.iter().find(|s| s.name == "lookup").expect("method");
    assert_eq!(method.kind, SymbolKind::Method);
    assert_eq!(method.scope, "class:UserService");
}

#[test]
fn test_typescript_arrow_function_binding() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("api.ts"),
        "export const fetchUser = async (id: string) => { return id; };\n",
    )
    .unwrap();

    let analyses = scanner.scan(dir.path(), false).unwrap();
    let a = analysis_for(&analyses, "api.ts");

    let arrows: Vec<_> = a
        .symbols
        .iter()
        .filter(|s| s.name == "fetchUser" && s.kind == SymbolKind::Function)
        .collect();
    assert!(!arrows.is_empty(), "symbols: {:?}", a.symbols);
    let sym = arrows[0];
    assert_eq!(sym.scope, "global");
    assert!(sym.modifiers.contains(&"export".to_string()));
    assert!(sym.modifiers.contains(&"async".to_string()));
}

#[test]
fn test_references_only_with_flag() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("calls.py"),
        "def helper():\n    pass\n\ndef main():\n    helper()\n",
    )
    .unwrap();

    let without = scanner.scan(dir.path(), false).unwrap();
    let a = analysis_for(&without, "calls.py");
    assert!(a.symbols.iter().all(|s| s.role == SymbolRole::Definition));

    let with = scanner.scan(dir.path(), true).unwrap();
    let a = analysis_for(&with, "calls.py");
    let call = a
        .symbols
        .iter()
        .find(|s| s.name == "helper" && s.role == SymbolRole::Reference)
        .expect("helper call reference");
    assert_eq!(call.kind, SymbolKind::Function);
}

#[test]
fn test_scan_is_deterministic() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.go"), "package a\n\nfunc A() {}\n").unwrap();
    fs::write(dir.path().join("b.go"), "package a\n\nfunc B() {}\n").unwrap();
    fs::write(
        dir.path().join("c.ts"),
        "export class C {\n  run(): void {}\n}\n",
    )
    .unwrap();

    let first = scanner.scan(dir.path(), true).unwrap();
    let second = scanner.scan(dir.path(), true).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_empty_tree_scans_clean() {
    let Some(scanner) = scanner_or_skip() else { return };

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "# nothing to match\n").unwrap();

    let analyses = scanner.scan(dir.path(), false).unwrap();
    assert!(analyses.is_empty(), "got: {:?}", paths(&analyses));
}
