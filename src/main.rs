use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cartograph::render::{self, RenderOptions};
use cartograph::scanner::{deps, git, walker, ImportIndex, SymbolScanner};

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Multi-language symbol maps for source trees", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and list symbols with scope and modifiers
    Symbols {
        /// Project directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Include references (call sites, constructions, type mentions)
        #[arg(long)]
        refs: bool,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Dump per-file imports and definitions for dependency tooling
    Deps {
        /// Project directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List files that import a given file
    Importers {
        /// Relative path of the target file (e.g. src/utils.ts)
        file: String,

        /// Project directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show changed files vs a git ref, ordered by import impact
    Diff {
        /// Project directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Git branch/ref to compare against
        #[arg(long = "ref", default_value = "main")]
        reference: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Commands::Symbols { path, refs, json } => {
            let scanner = SymbolScanner::new()?;
            let analyses = scanner.scan(&path, refs)?;
            render::render_symbols(
                &analyses,
                RenderOptions {
                    show_references: refs,
                    json,
                },
            )?;
        }

        Commands::Deps { path, json } => {
            let scanner = SymbolScanner::new()?;
            let analyses = scanner.scan(&path, false)?;
            let external = deps::read_external_deps(&path);
            if json {
                #[derive(serde::Serialize)]
                struct DepsReport<'a> {
                    files: &'a [cartograph::scanner::FileAnalysis],
                    external_deps: &'a cartograph::scanner::ExternalDeps,
                }
                let report = DepsReport {
                    files: &analyses,
                    external_deps: &external,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (lang, names) in &external {
                    println!("{} {}", format!("{lang}:").dimmed(), names.join(", "));
                }
                if !external.is_empty() {
                    println!();
                }
                let index = ImportIndex::build(&analyses);
                for analysis in &analyses {
                    if let Some(imports) = index.imports_of(&analysis.path) {
                        if !imports.is_empty() {
                            let list: Vec<&str> = imports.iter().map(String::as_str).collect();
                            println!(
                                "{} {} {}",
                                analysis.path.cyan(),
                                "->".dimmed(),
                                list.join(", ")
                            );
                        }
                    }
                }
            }
        }

        Commands::Importers { file, path } => {
            let scanner = SymbolScanner::new()?;
            let analyses = scanner.scan(&path, false)?;
            let index = ImportIndex::build(&analyses);
            let importers = index.who_imports(&file);
            if importers.is_empty() {
                println!("No files import '{file}'");
            } else {
                println!("{} files import '{}':", importers.len(), file);
                for importer in importers {
                    println!("  {importer}");
                }
            }
        }

        Commands::Diff {
            path,
            reference,
            json,
        } => {
            let info = git::diff_info(&path, &reference)?;
            if info.changed.is_empty() {
                println!("No files changed vs {reference}");
                return Ok(());
            }

            let files = walker::scan_files(&path)?;
            let changed = git::filter_to_changed(files, &info);

            let scanner = SymbolScanner::new()?;
            let analyses = scanner.scan(&path, false)?;
            let impacts = ImportIndex::build(&analyses).impact(&changed);

            if json {
                #[derive(serde::Serialize)]
                struct DiffReport<'a> {
                    reference: &'a str,
                    files: &'a [cartograph::scanner::FileInfo],
                    impact: &'a [cartograph::scanner::ImpactInfo],
                }
                let report = DiffReport {
                    reference: &reference,
                    files: &changed,
                    impact: &impacts,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} files changed vs {}", changed.len(), reference);
                for f in &changed {
                    let marker = if f.is_new { "new".green() } else { "mod".yellow() };
                    println!("  {} {} +{} -{}", marker, f.path, f.added, f.removed);
                }
                if !impacts.is_empty() {
                    println!("\n{}", "Impact (imported by other files):".dimmed());
                    for impact in &impacts {
                        println!("  {} ({} importers)", impact.file, impact.used_by);
                    }
                }
            }
        }
    }

    Ok(())
}

fn init_tracing(level: &str) -> Result<()> {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
