// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use exk_cli::commands::{self, NewException};
use exk_cli::config::{ExkConfig, load_config, validate_config};
use exk_cli::format::{self, OutputFormat};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "exk", version, about = "Inspect and build serialized exceptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an exk.toml configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in and configured error codes.
    Codes {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Output format: `text` or `json`.
        #[arg(long, conflicts_with = "json")]
        format: Option<OutputFormat>,
    },

    /// Classify a JSON document (file or stdin).
    Inspect {
        /// File to read; `-` or omitted reads stdin.
        path: Option<PathBuf>,

        /// Additional code treated as an abort. Can be repeated.
        #[arg(long = "abort-code")]
        abort_codes: Vec<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Output format: `text` or `json`.
        #[arg(long, conflicts_with = "json")]
        format: Option<OutputFormat>,
    },

    /// Print the JSON form of a new exception.
    New {
        /// Message text.
        #[arg(long)]
        message: String,

        /// Code label (e.g. EXPIRED) or literal wire value.
        #[arg(long)]
        code: Option<String>,

        /// Category label.
        #[arg(long, conflicts_with = "abort")]
        name: Option<String>,

        /// Transport status (any JSON number).
        #[arg(long)]
        status: Option<serde_json::Number>,

        /// Cause text.
        #[arg(long)]
        cause: Option<String>,

        /// Build an AbortError.
        #[arg(long)]
        abort: bool,
    },

    /// Print the JSON Schema of the exception wire shape.
    Schema {
        /// Which schema to print.
        #[arg(long, value_enum, default_value_t = SchemaArg::Exception)]
        target: SchemaArg,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum SchemaArg {
    Exception,
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())
        .context("failed to load configuration")?;

    let level = if cli.debug {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("exk={level}")))
        .with_writer(std::io::stderr)
        .init();

    for warning in validate_config(&config)? {
        warn!(target: "exk.cli", "{warning}");
    }

    match cli.command {
        Commands::Codes { json, format } => cmd_codes(&config, output_format(json, format)),
        Commands::Inspect {
            path,
            abort_codes,
            json,
            format,
        } => cmd_inspect(
            &config,
            path.as_deref(),
            &abort_codes,
            output_format(json, format),
        ),
        Commands::New {
            message,
            code,
            name,
            status,
            cause,
            abort,
        } => cmd_new(
            &config,
            NewException {
                message,
                code,
                name,
                status,
                cause,
                abort,
            },
        ),
        Commands::Schema { target } => cmd_schema(target),
    }
}

fn output_format(json: bool, format: Option<OutputFormat>) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        format.unwrap_or(OutputFormat::Text)
    }
}

fn cmd_codes(config: &ExkConfig, format: OutputFormat) -> Result<()> {
    let entries = commands::code_entries(config);
    print!("{}", format::format_codes(&entries, format));
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn cmd_inspect(
    config: &ExkConfig,
    path: Option<&Path>,
    extra_codes: &[String],
    format: OutputFormat,
) -> Result<()> {
    let text = read_input(path)?;
    let value: Value = serde_json::from_str(&text).context("input is not valid JSON")?;

    let mut abort_codes = config.abort_codes();
    abort_codes.extend(extra_codes.iter().map(|raw| config.resolve_code(raw)));
    debug!(target: "exk.cli", codes = abort_codes.len(), "inspecting document");

    let report = commands::inspect(&value, &abort_codes);
    print!("{}", format::format_report(&report, format));
    if format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

fn cmd_new(config: &ExkConfig, request: NewException) -> Result<()> {
    let value = commands::build(request, config).context("failed to serialize exception")?;
    println!("{}", format::to_json(&value));
    Ok(())
}

fn cmd_schema(target: SchemaArg) -> Result<()> {
    let schema = match target {
        SchemaArg::Exception => commands::exception_schema()?,
        SchemaArg::Config => serde_json::to_value(schemars::schema_for!(ExkConfig))?,
    };
    println!("{}", format::to_json(&schema));
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            if buf.trim().is_empty() {
                bail!("no input on stdin");
            }
            Ok(buf)
        }
    }
}
