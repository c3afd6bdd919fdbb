use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

/// External dependencies declared in package manifests, grouped by the
/// language tag they belong to.
pub type ExternalDeps = BTreeMap<String, Vec<String>>;

/// Read dependency names from the manifests present at the project root
/// (`go.mod`, `package.json`, `Cargo.toml`, `requirements.txt`). Missing or
/// malformed manifests contribute nothing.
pub fn read_external_deps(root: &Path) -> ExternalDeps {
    let mut deps = ExternalDeps::new();

    if let Some(names) = read_go_mod(&root.join("go.mod")) {
        deps.insert("go".to_string(), names);
    }
    if let Some(names) = read_package_json(&root.join("package.json")) {
        deps.insert("javascript".to_string(), names);
    }
    if let Some(names) = read_cargo_toml(&root.join("Cargo.toml")) {
        deps.insert("rust".to_string(), names);
    }
    if let Some(names) = read_requirements(&root.join("requirements.txt")) {
        deps.insert("python".to_string(), names);
    }

    debug!(languages = deps.len(), "read external deps");
    deps
}

/// `require` lines of a go.mod, both single and block form.
fn read_go_mod(path: &Path) -> Option<Vec<String>> {
    let contents = fs::read_to_string(path).ok()?;
    let mut names = Vec::new();
    let mut in_block = false;

    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with("require (") {
            in_block = true;
            continue;
        }
        if in_block && line == ")" {
            in_block = false;
            continue;
        }

        let module = if in_block {
            line
        } else if let Some(rest) = line.strip_prefix("require ") {
            rest
        } else {
            continue;
        };

        if let Some(name) = module.split_whitespace().next() {
            if !name.is_empty() && !name.starts_with("//") {
                names.push(name.to_string());
            }
        }
    }

    (!names.is_empty()).then_some(names)
}

#[derive(Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

fn read_package_json(path: &Path) -> Option<Vec<String>> {
    let contents = fs::read_to_string(path).ok()?;
    let manifest: PackageJson = serde_json::from_str(&contents).ok()?;
    let names: Vec<String> = manifest
        .dependencies
        .keys()
        .chain(manifest.dev_dependencies.keys())
        .cloned()
        .collect();
    (!names.is_empty()).then_some(names)
}

#[derive(Deserialize)]
struct CargoManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, toml::Value>,
    #[serde(default, rename = "dev-dependencies")]
    dev_dependencies: BTreeMap<String, toml::Value>,
}

fn read_cargo_toml(path: &Path) -> Option<Vec<String>> {
    let contents = fs::read_to_string(path).ok()?;
    let manifest: CargoManifest = toml::from_str(&contents).ok()?;
    let names: Vec<String> = manifest
        .dependencies
        .keys()
        .chain(manifest.dev_dependencies.keys())
        .cloned()
        .collect();
    (!names.is_empty()).then_some(names)
}

/// requirements.txt entries, with version specifiers and extras stripped.
fn read_requirements(path: &Path) -> Option<Vec<String>> {
    let contents = fs::read_to_string(path).ok()?;
    let mut names = Vec::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
            continue;
        }
        let name = line
            .split(|c: char| matches!(c, '=' | '<' | '>' | '~' | '!' | '[' | ';' | ' '))
            .next()
            .unwrap_or(line)
            .trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }

    (!names.is_empty()).then_some(names)
}
