//! colforge CLI - Compile table definitions to physical column layouts
//!
//! Usage:
//!   colforge compile <table.toml> [--output json]
//!   colforge hierarchy <table.toml>
//!   colforge validate <table.toml>
//!   colforge dictionaries <table.toml> [--store <root>]
//!
//! Examples:
//!   colforge compile tables/sales.toml
//!   colforge --log-level debug compile tables/sales.json --output json
//!   colforge dictionaries tables/sales.toml --store /var/colforge

use clap::{Parser, Subcommand, ValueEnum};
use colforge::compile::Compiler;
use colforge::config::{Settings, SettingsError};
use colforge::dictionary::TableIdentifier;
use colforge::model::TableDefinition;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "colforge")]
#[command(about = "colforge - Compile logical table definitions to physical column schemas")]
#[command(version)]
struct Cli {
    /// Path to a colforge.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a table definition to its physical schema
    Compile {
        /// Path to the .toml or .json definition
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Print the legacy dimension/hierarchy view of a definition
    Hierarchy {
        /// Path to the .toml or .json definition
        file: PathBuf,
    },

    /// Validate a definition without printing the schema
    Validate {
        /// Path to the .toml or .json definition
        file: PathBuf,
    },

    /// Report which dictionary files already exist for a table
    Dictionaries {
        /// Path to the .toml or .json definition
        file: PathBuf,

        /// Storage root (defaults to [storage].root from the config)
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// One line per column
    Text,
    /// The compiled table as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let compiler = match settings.compiler.compiler() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile { file, output } => cmd_compile(&compiler, file, output),
        Commands::Hierarchy { file } => cmd_hierarchy(&compiler, file),
        Commands::Validate { file } => cmd_validate(&compiler, file),
        Commands::Dictionaries { file, store } => cmd_dictionaries(&compiler, &settings, file, store),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    }
}

fn read_definition(file: &Path) -> Option<TableDefinition> {
    match TableDefinition::from_file(file) {
        Ok(definition) => Some(definition),
        Err(e) => {
            eprintln!("Error reading definition '{}': {}", file.display(), e);
            None
        }
    }
}

fn cmd_compile(compiler: &Compiler, file: PathBuf, output: OutputFormat) -> ExitCode {
    let Some(definition) = read_definition(&file) else {
        return ExitCode::FAILURE;
    };

    let compiled = match compiler.compile(&definition) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Text => {
            println!("-- Table: {}.{}", compiled.database_name, compiled.table_name);
            println!(
                "-- Partitioner: {} (count {}, columns [{}])",
                compiled.partitioner.class,
                compiled.partitioner.count,
                compiled.partitioner.columns.join(", ")
            );
            println!();
            println!("{}", compiled.schema.describe());
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&compiled) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize schema: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn cmd_hierarchy(compiler: &Compiler, file: PathBuf) -> ExitCode {
    let Some(definition) = read_definition(&file) else {
        return ExitCode::FAILURE;
    };

    match compiler.compile_hierarchy(&definition) {
        Ok(table) => {
            println!("-- Table: {}.{}", table.database_name, table.table_name);
            println!();
            println!("{}", table.describe());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(compiler: &Compiler, file: PathBuf) -> ExitCode {
    let Some(definition) = read_definition(&file) else {
        return ExitCode::FAILURE;
    };

    let physical = compiler.compile(&definition);
    let legacy = compiler.compile_hierarchy(&definition);

    let mut failed = false;
    for err in [physical.err(), legacy.err()].into_iter().flatten() {
        eprintln!("Validation error: {}", err);
        failed = true;
    }
    if failed {
        return ExitCode::FAILURE;
    }

    println!("OK: {} is valid", file.display());
    ExitCode::SUCCESS
}

fn cmd_dictionaries(
    compiler: &Compiler,
    settings: &Settings,
    file: PathBuf,
    store: Option<PathBuf>,
) -> ExitCode {
    let root = match store {
        Some(root) => root,
        None => match settings.storage.resolved_root() {
            Ok(Some(root)) => root,
            Ok(None) => {
                eprintln!("No storage root: pass --store or set [storage].root");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let Some(definition) = read_definition(&file) else {
        return ExitCode::FAILURE;
    };
    let compiled = match compiler.compile(&definition) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let table = TableIdentifier::new(&compiled.database_name, &compiled.table_name);
    let dictionary_columns = compiled
        .schema
        .dimensions()
        .filter(|c| c.has_encoding(colforge::Encoding::Dictionary));
    match settings
        .storage
        .locator()
        .locate(dictionary_columns, &root, &table)
    {
        Ok(files) => {
            for file in files {
                let status = if file.exists { "present" } else { "missing" };
                println!("{} {} {}", file.column_name, status, file.path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Dictionary lookup error: {}", e);
            ExitCode::FAILURE
        }
    }
}
