use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use csbind_config::GeneratorConfig;
use csbind_decl::GraphDumpParser;
use tracing::debug;

/// Generate C# P/Invoke bindings from a C declaration graph.
#[derive(Debug, Parser)]
#[command(name = "csbind", version, about)]
struct Cli {
    /// Generator configuration (`.json`, anything else is read as TOML).
    #[arg(short, long)]
    config: PathBuf,

    /// JSON dump of the parsed headers.
    #[arg(short, long)]
    graph: PathBuf,

    /// Overrides the configured output directory.
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Overrides the configured namespace.
    #[arg(long, value_name = "NS")]
    namespace: Option<String>,

    /// Refuse a non-empty output directory instead of clearing it.
    #[arg(long)]
    no_clear: bool,

    /// Debug-level logging (`RUST_LOG` takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::from_file(&self.config)?;
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        if self.no_clear {
            config.force_clear_output = false;
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.load_config()?;
    debug!(
        config = %cli.config.display(),
        libraries = config.libraries.len(),
        "configuration loaded"
    );
    let mut parser = GraphDumpParser::new(&cli.graph);
    let report = csbind_gen::generate_to_directory(&config, &mut parser)
        .with_context(|| format!("generation into {} failed", config.output_dir.display()))?;

    let orphans = if report.orphans.is_empty() {
        "no unreferenced declarations".dimmed()
    } else {
        format!("{} unreferenced declarations", report.orphans.len()).yellow()
    };
    println!(
        "{} {} artifacts in {} ({orphans})",
        "generated".green().bold(),
        report.artifacts.len(),
        config.output_dir.display(),
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    csbind_utils::init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
