//! pathql CLI - Compile JSON query models to object queries
//!
//! Usage:
//!   pathql compile <query.json> [--count] [--config <file>] [--format <format>]
//!   pathql validate <query.json>
//!
//! Examples:
//!   pathql compile orders.json
//!   pathql compile orders.json --count --format json
//!   RUST_LOG=debug pathql compile orders.json --config pathql.toml

use clap::{Parser, Subcommand, ValueEnum};
use pathql::compiler::{CompiledStatement, QueryCompiler};
use pathql::config::Settings;
use pathql::model::Query;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "pathql")]
#[command(about = "pathql - Compile entity query models to parameterized object queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query model
    Compile {
        /// Path to the JSON query file
        file: PathBuf,

        /// Compile the row-count statement instead
        #[arg(long)]
        count: bool,

        /// Settings file (defaults to PATHQL_CONFIG, ./pathql.toml, then the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate a query model without compiling it
    Validate {
        /// Path to the JSON query file
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Statement, then parameters and warnings
    Text,
    /// A JSON object with text, parameters and diagnostics
    Json,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            file,
            count,
            config,
            format,
        } => cmd_compile(&file, count, config.as_deref(), format),
        Commands::Validate { file } => cmd_validate(&file),
    }
}

fn read_query(file: &Path) -> Result<Query, String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("Error reading file '{}': {}", file.display(), e))?;
    serde_json::from_str(&source)
        .map_err(|e| format!("Error parsing query '{}': {}", file.display(), e))
}

fn cmd_compile(file: &Path, count: bool, config: Option<&Path>, format: OutputFormat) -> ExitCode {
    let query = match read_query(file) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = match Settings::load(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let compiler = QueryCompiler::with_options(settings.compile_options());
    let result = if count {
        compiler.compile_count_statement(&query)
    } else {
        compiler.compile_statement(&query)
    };

    match result {
        Ok(compiled) => print_compiled(&compiled, format),
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_compiled(compiled: &CompiledStatement, format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Text => {
            println!("{}", compiled.text);
            if !compiled.parameters.is_empty() {
                println!();
                println!("Parameters:");
                for (name, value) in &compiled.parameters {
                    println!("  :{} = {}", name, value);
                }
            }
            for diagnostic in &compiled.diagnostics {
                eprintln!("warning: {}", diagnostic);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(compiled) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error writing JSON: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn cmd_validate(file: &Path) -> ExitCode {
    let query = match read_query(file) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = query.validate() {
        eprintln!("Validation error: {}", e);
        return ExitCode::FAILURE;
    }

    if let Some(filter) = &query.filter {
        for location in filter.null_child_locations() {
            eprintln!("warning: null restriction at {}", location);
        }
    }

    println!("OK: {} is valid", file.display());
    ExitCode::SUCCESS
}
