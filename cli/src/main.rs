mod output;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use hcl_schema_core::{Diagnostic, Document, compile_schema};
use hcl_schema_resolve::{CacheConfig, SchemaValidator, validate_with_schema};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage errors and failures to emit output.
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "hclschema", version)]
#[command(about = "Validate HCL documents against HCL meta-schemas")]
struct Cli {
    /// Detect the schema through the document's `__schema` attribute.
    #[arg(
        long,
        default_value_t = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    detect: bool,
    /// Compile <DOCUMENT> as a meta-schema and report its diagnostics only.
    #[arg(long)]
    check_schema: bool,
    /// YAML file with remote schema cache settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for cached remote schemas (overrides the config file).
    #[arg(long)]
    cache_dir: Option<PathBuf>,
    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// HCL document to validate.
    document: PathBuf,
    /// Meta-schema to validate against instead of the linked one.
    schema: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    tracing::debug!(version = PACKAGE_VERSION, "hclschema starting");

    let diags = match run(&cli) {
        Ok(diags) => diags,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let fallback = output::fallback_file(&cli.document);
    if let Err(err) = output::write_json(io::stdout().lock(), &diags, &fallback) {
        eprintln!("{err}");
        return ExitCode::from(EXIT_USAGE);
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Runs the selected mode. `Err` is reserved for usage errors; everything
/// else is reported as diagnostics.
fn run(cli: &Cli) -> Result<Vec<Diagnostic>, String> {
    if cli.check_schema {
        return Ok(check_schema(&cli.document));
    }

    if let Some(schema) = &cli.schema {
        return Ok(validate_with_schema(schema, &cli.document));
    }

    if !cli.detect {
        return Err("a <SCHEMA> argument is required when --detect=false".to_string());
    }

    let config = load_config(cli)?;
    let validator = match SchemaValidator::from_config(&config) {
        Ok(validator) => validator,
        Err(err) => return Ok(vec![err.to_diagnostic()]),
    };
    Ok(validator.validate_linked(&cli.document))
}

fn check_schema(path: &Path) -> Vec<Diagnostic> {
    match Document::from_file(path) {
        Ok(doc) => compile_schema(&doc).1,
        Err(diag) => vec![diag],
    }
}

fn load_config(cli: &Cli) -> Result<CacheConfig, String> {
    let config = match &cli.config {
        Some(path) => match CacheConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                let path = path.display();
                return Err(format!("Failed to load config '{path}': {}", err.detail()));
            }
        },
        None => CacheConfig::default(),
    };

    Ok(match &cli.cache_dir {
        Some(dir) => config.with_cache_dir(dir),
        None => config,
    })
}
