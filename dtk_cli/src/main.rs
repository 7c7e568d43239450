//! # dtk
//!
//! Resolves design token files, evaluates single expressions and lists the
//! function catalog.

mod logger;

use clap::{Parser, Subcommand, ValueEnum};
use logger::LogFormat;
use dtk_core::config::{ConfigError, EngineConfig};
use dtk_core::logging::codes;
use dtk_core::tree::{TokenTree, TreeError};
use dtk_core::{log_info, log_success};
use dtk_engine::{FunctionFamily, ResolutionReport, TokenEngine};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status for unreadable or invalid input
const EXIT_INVALID_INPUT: u8 = 2;

#[derive(Parser)]
#[command(name = "dtk")]
#[command(version)]
#[command(about = "Design token expression engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log line format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every token in a JSON token file
    Resolve {
        /// Token file
        tokens: PathBuf,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the resolution report to stderr
        #[arg(long)]
        report: bool,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        report_format: ReportFormat,

        /// Write compact JSON instead of pretty printing
        #[arg(long)]
        compact: bool,
    },

    /// Evaluate one expression, optionally against a token file
    Eval {
        /// Expression such as "tint({color.brand}, 20%)"
        expression: String,

        /// Token file the expression may reference
        #[arg(short, long)]
        tokens: Option<PathBuf>,
    },

    /// List the function catalog
    Functions {
        /// Only one family (color, contrast, typography, math)
        #[arg(short, long)]
        family: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    /// Text with category, severity and recommended action per diagnostic
    Detailed,
    Json,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid token file '{path}': {source}")]
    Tree {
        path: String,
        #[source]
        source: TreeError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown function family '{0}'")]
    UnknownFamily(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose, cli.log_format) {
        eprintln!("Warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(EXIT_INVALID_INPUT)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let engine = build_engine(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve {
            tokens,
            output,
            report,
            report_format,
            compact,
        } => resolve(&engine, &tokens, output.as_deref(), report.then_some(report_format), compact),
        Commands::Eval { expression, tokens } => eval(&engine, &expression, tokens.as_deref()),
        Commands::Functions { family, json } => functions(&engine, family.as_deref(), json),
    }
}

fn build_engine(config: Option<&Path>) -> Result<TokenEngine, CliError> {
    let Some(path) = config else {
        return Ok(TokenEngine::new());
    };

    let config = EngineConfig::load(path)?;
    log_success!(codes::success::CONFIGURATION_LOADED, "Configuration loaded",
        "path" => path.display()
    );
    Ok(TokenEngine::with_config(config)?)
}

fn load_tree(path: &Path) -> Result<TokenTree, CliError> {
    let source = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let tree = TokenTree::parse(&source).map_err(|source| CliError::Tree {
        path: path.display().to_string(),
        source,
    })?;

    log_success!(codes::success::TREE_LOADED, "Token file loaded",
        "path" => path.display(),
        "tokens" => tree.token_count()
    );
    Ok(tree)
}

fn resolve(
    engine: &TokenEngine,
    tokens: &Path,
    output: Option<&Path>,
    report_format: Option<ReportFormat>,
    compact: bool,
) -> Result<(), CliError> {
    let tree = load_tree(tokens)?;
    let (resolved, report) = engine.resolve_all_with_report(&tree);

    let document = resolved.to_json();
    let mut rendered = if compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    rendered.push('\n');

    match output {
        Some(path) => {
            fs::write(path, rendered).map_err(|source| CliError::Write {
                path: path.display().to_string(),
                source,
            })?;
            log_info!("Resolved tokens written", "path" => path.display());
        }
        None => print!("{}", rendered),
    }

    if let Some(format) = report_format {
        print_report(&report, format)?;
    }
    Ok(())
}

fn print_report(report: &ResolutionReport, format: ReportFormat) -> Result<(), CliError> {
    match format {
        ReportFormat::Json => eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?),
        ReportFormat::Text | ReportFormat::Detailed => {
            if format == ReportFormat::Detailed {
                eprint!("{}", report.format_detailed());
            } else {
                eprint!("{}", report.format_text());
            }
            eprintln!(
                "{} token(s) resolved, {} changed, {} with warnings",
                report.stats.visited, report.stats.changed, report.stats.unresolved
            );
        }
    }
    Ok(())
}

fn eval(engine: &TokenEngine, expression: &str, tokens: Option<&Path>) -> Result<(), CliError> {
    let tree = match tokens {
        Some(path) => load_tree(path)?,
        None => TokenTree::default(),
    };

    let (value, report) = engine.resolve_one_with_report(&Value::String(expression.to_string()), &tree);
    match value {
        Value::String(text) => println!("{}", text),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }

    if report.has_warnings() {
        eprint!("{}", report.format_text());
    }
    Ok(())
}

fn functions(engine: &TokenEngine, family: Option<&str>, json: bool) -> Result<(), CliError> {
    let listing = match family {
        Some(name) => {
            let family = FunctionFamily::parse(name)
                .ok_or_else(|| CliError::UnknownFamily(name.to_string()))?;
            engine.catalog().list_family(family)
        }
        None => engine.list_functions(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let width = listing.iter().map(|f| f.signature.len()).max().unwrap_or(0);
    let mut current = None;
    for info in &listing {
        if current != Some(info.family) {
            println!("{}{}", if current.is_some() { "\n" } else { "" }, info.family);
            current = Some(info.family);
        }
        println!("  {:width$}  {}", info.signature, info.description, width = width);
    }
    Ok(())
}
