//! Bramble CLI
//!
//! Entry point for the `bramble` command-line tool.

use bramble::{load_file, EffectiveConfig, Loaded, LoaderOptions};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Project config picked up from the working directory when present.
const PROJECT_CONFIG: &str = "bramble.toml";

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BRAMBLE_LOG";

#[derive(Parser)]
#[command(name = "bramble")]
#[command(about = "Inspect indented property trees", version)]
struct Cli {
    /// Host/user config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Project config file (TOML, default: ./bramble.toml)
    #[arg(long, global = true)]
    project_config: Option<PathBuf>,

    /// Maximum include nesting depth
    #[arg(long, global = true)]
    max_include_depth: Option<usize>,

    /// Name of the synthetic root node
    #[arg(long, global = true)]
    root_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective tree
    Show {
        /// Property file to load
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the value at a dotted path
    Get {
        /// Property file to load
        file: PathBuf,

        /// Dotted path, e.g. monsters.goblin.health
        path: String,

        /// Require the value to be an integer
        #[arg(long)]
        int: bool,
    },

    /// Load a file and report the sources it was built from
    Verify {
        /// Property file to load
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let options = match effective_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Show { file, json } => run_show(&file, &options, json),
        Commands::Get { file, path, int } => run_get(&file, &path, &options, int),
        Commands::Verify { file, json } => run_verify(&file, &options, json),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn effective_options(cli: &Cli) -> Result<LoaderOptions, bramble::ConfigError> {
    let mut overrides = serde_json::Map::new();
    if let Some(depth) = cli.max_include_depth {
        overrides.insert("max_include_depth".to_string(), depth.into());
    }
    if let Some(ref name) = cli.root_name {
        overrides.insert("root_name".to_string(), name.clone().into());
    }
    let overrides = (!overrides.is_empty()).then(|| serde_json::Value::Object(overrides));

    let project = cli
        .project_config
        .clone()
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG));

    let config = EffectiveConfig::build(cli.config.as_deref(), Some(&project), overrides)?;
    Ok(config.options)
}

fn load_or_exit(file: &Path, options: &LoaderOptions) -> Loaded {
    match load_file(file, options) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error loading {}: {}", file.display(), e);
            process::exit(1);
        }
    }
}

fn run_show(file: &Path, options: &LoaderOptions, json: bool) {
    let loaded = load_or_exit(file, options);
    let snapshot = loaded.root.snapshot();

    if json {
        match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", snapshot.to_human());
    }
}

fn run_get(file: &Path, path: &str, options: &LoaderOptions, int: bool) {
    let loaded = load_or_exit(file, options);

    let Some(found) = loaded.root.get_path(path) else {
        eprintln!("Not found: {}", path);
        process::exit(1);
    };

    if int {
        match found.as_int() {
            Ok(value) => println!("{}", value),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("{}", found.value());
    }
}

fn run_verify(file: &Path, options: &LoaderOptions, json: bool) {
    let loaded = load_or_exit(file, options);

    if json {
        let output = serde_json::json!({
            "file": file.display().to_string(),
            "nodes": loaded.root.snapshot().descendants(),
            "report": loaded.report,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Property file valid: {}", file.display());
        println!();
        println!("  Top-level nodes: {}", loaded.root.len());
        println!("  Total nodes: {}", loaded.root.snapshot().descendants());
        println!("{}", loaded.report.to_human());
    }
}
