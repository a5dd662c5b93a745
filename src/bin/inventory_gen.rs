//! Inventory Generator CLI
//!
//! Thin front end over the library: reads YAML, runs the pipeline, prints
//! YAML or JSON.
//!
//! # Usage
//!
//! ```bash
//! # Prepared template variables for step 2, with an override file
//! inventory-gen generate --step 2 model.yml --override site.yml
//!
//! # Host mapping only (what provisioners consume)
//! inventory-gen expand model.yml
//!
//! # Merge YAML documents left to right
//! inventory-gen merge defaults.yml site.yml
//!
//! # Check arities and print a per-profile report
//! inventory-gen validate model.yml --format json
//!
//! # Debug dump: INVENTORY_GEN_DEBUG=1 (path from INVENTORY_GEN_DUMP),
//! # or --debug-dump PATH
//! inventory-gen generate --step 1 model.yml --debug-dump inventory.debug.yml
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_yaml::{Mapping, Value};

use inventory_gen::{
    expand_hosts, expand_keyed, merge_into, prepare_inventory, Generator, GeneratorConfig,
    ValidationReport,
};

#[derive(Parser)]
#[command(name = "inventory-gen")]
#[command(version)]
#[command(about = "Expand and validate pattern-based host inventories")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand, merge overrides, validate and print the template variables
    Generate {
        /// Step number injected as `step`
        #[arg(long, short)]
        step: i64,

        /// Model file
        model: PathBuf,

        /// Override files, merged in order after expansion
        #[arg(long = "override")]
        overrides: Vec<PathBuf>,

        /// Write the prepared inventory here as well
        #[arg(long)]
        debug_dump: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'o', default_value = "yaml", value_enum)]
        format: OutputFormat,
    },

    /// Expand marked keys of the model and print the result
    Expand {
        /// Model file
        model: PathBuf,

        /// Output format
        #[arg(long, short = 'o', default_value = "yaml", value_enum)]
        format: OutputFormat,
    },

    /// Deep-merge YAML files left to right
    Merge {
        /// Files to merge
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, short = 'o', default_value = "yaml", value_enum)]
        format: OutputFormat,
    },

    /// Expand hosts and check profiles and arities
    Validate {
        /// Model file
        model: PathBuf,

        /// Report format
        #[arg(long, short = 'o', default_value = "text", value_enum)]
        format: ReportFormat,
    },
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            step,
            model,
            overrides,
            debug_dump,
            format,
        } => cmd_generate(step, &model, &overrides, debug_dump, format),
        Commands::Expand { model, format } => cmd_expand(&model, format),
        Commands::Merge { files, format } => cmd_merge(&files, format),
        Commands::Validate { model, format } => cmd_validate(&model, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_generate(
    step: i64,
    model: &Path,
    overrides: &[PathBuf],
    debug_dump: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = GeneratorConfig::from_env();
    if let Some(path) = debug_dump {
        config = config.with_debug_dump(path);
    }

    let model = read_mapping(model)?;
    let overrides = overrides
        .iter()
        .map(|path| read_mapping(path))
        .collect::<Result<Vec<_>>>()?;

    let variables = Generator::new(config).prepare(step, model, &overrides)?;
    print_mapping(&variables, format)
}

fn cmd_expand(model: &Path, format: OutputFormat) -> Result<()> {
    let model = read_mapping(model)?;
    print_mapping(&expand_keyed(&model), format)
}

fn cmd_merge(files: &[PathBuf], format: OutputFormat) -> Result<()> {
    let mut merged = Mapping::new();
    for path in files {
        merge_into(&mut merged, &read_mapping(path)?);
    }
    print_mapping(&merged, format)
}

fn cmd_validate(model: &Path, format: ReportFormat) -> Result<()> {
    let mut model = read_mapping(model)?;
    expand_hosts(&mut model);
    let report = prepare_inventory(&mut model)?;

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_report(&report),
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn read_mapping(path: &Path) -> Result<Mapping> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => anyhow::bail!("{} does not contain a YAML mapping", path.display()),
    }
}

fn print_mapping(mapping: &Mapping, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(mapping)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(mapping)?),
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    println!("{} inventory {}", "OK".green(), report.name.bold());
    for profile in &report.profiles {
        println!(
            "  {} (arity {}): {} host(s) {}",
            profile.profile,
            profile.arity,
            profile.hosts.len(),
            profile.hosts.join(", ").dimmed()
        );
    }
}
