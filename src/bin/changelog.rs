//! Changelog CLI
//!
//! Inspects markdown changelogs and converts them to the JSON interchange form.

use std::path::{Path, PathBuf};

use changelog_parser::config::OutputFormat;
use changelog_parser::{
    ChangeKind, Changelog, ChangelogConfig, ChangelogVersion, JsonReader, MarkdownReader,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "changelog")]
#[command(about = "Parse structured changelogs and export them as JSON")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to changelog.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List versions in document order
    Versions {
        /// Markdown changelog (defaults to the configured source)
        file: Option<PathBuf>,
    },

    /// Show the changes of a version
    Show {
        /// Markdown changelog (defaults to the configured source)
        file: Option<PathBuf>,
        /// Version number (defaults to the latest)
        version: Option<String>,
    },

    /// Export versions and changes as JSON
    Export {
        /// Markdown changelog (defaults to the configured source)
        file: Option<PathBuf>,
        /// Output file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write compact JSON regardless of configuration
        #[arg(long)]
        compact: bool,
    },

    /// Load an exported JSON file and summarize it
    Import {
        /// JSON file produced by `export`
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ChangelogConfig::load_from(cli.config.as_deref())?;

    match cli.command {
        Commands::Versions { file } => {
            let changelog = read_markdown(&config, file.as_deref())?;

            if changelog.is_empty() {
                println!("No versions found");
                return Ok(());
            }

            for version in changelog.versions() {
                println!("{}  ({} changes)", version, version.changes().len());
            }
            Ok(())
        }

        Commands::Show { file, version } => {
            let changelog = read_markdown(&config, file.as_deref())?;

            let version = match version {
                Some(number) => changelog.version_by_number(&number)?,
                None => changelog.require_latest_version()?,
            };

            print_version(version);
            Ok(())
        }

        Commands::Export {
            file,
            output,
            compact,
        } => {
            let changelog = read_markdown(&config, file.as_deref())?;

            let json = if compact || config.export.output_format == OutputFormat::Compact {
                changelog.to_json()?
            } else {
                changelog.to_json_pretty()?
            };

            if let Some(path) = output {
                std::fs::write(&path, &json)?;
                println!(
                    "✅ Exported {} version(s) to {}",
                    changelog.len(),
                    path.display()
                );
            } else {
                println!("{}", json);
            }
            Ok(())
        }

        Commands::Import { file } => {
            let changelog = JsonReader::read_file(&file)?;
            let changes: usize = changelog.versions().iter().map(|v| v.changes().len()).sum();

            println!(
                "✅ {} - {} version(s), {} change(s)",
                file.display(),
                changelog.len(),
                changes
            );
            for number in changelog.version_numbers() {
                println!("  └─ {}", number);
            }
            Ok(())
        }
    }
}

fn read_markdown(
    config: &ChangelogConfig,
    file: Option<&Path>,
) -> Result<Changelog, Box<dyn std::error::Error>> {
    let path = file.unwrap_or(config.source.path.as_path());
    let reader = MarkdownReader::with_options(config.scan_options());

    Ok(reader.read_file(path).into_result()?)
}

fn print_version(version: &ChangelogVersion) {
    println!("{}", version);
    println!();

    for change in version.changes() {
        let scope = match change.kind() {
            ChangeKind::Content => "C",
            ChangeKind::Global => "G",
            ChangeKind::Misc => " ",
        };

        if change.category().is_empty() {
            println!("  [{}] {:<9} {}", scope, change.change_type(), change.text());
        } else {
            println!(
                "  [{}] {:<9} {}: {}",
                scope,
                change.change_type(),
                change.category(),
                change.text()
            );
        }
    }

    let freeform = version.freeform_text();
    if !freeform.is_empty() {
        println!();
        println!("{}", freeform);
    }
}
