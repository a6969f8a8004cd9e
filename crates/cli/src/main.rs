mod commands;
mod config;
mod input;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use formwright_core::FieldType;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Formwright form definition toolkit.
#[derive(Parser)]
#[command(name = "formwright", version, about = "Formwright form definition toolkit")]
struct Cli {
    /// Output format (text or json) [default: text]
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log evaluation details to stderr
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Path to a formwright.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a form definition for broken derivations and formulas
    Check {
        /// Path to the form JSON file
        form: PathBuf,
    },

    /// Print the values a freshly displayed form starts with
    InitValues {
        /// Path to the form JSON file
        form: PathBuf,
    },

    /// Recompute derived fields for a set of entered values
    Resolve {
        /// Path to the form JSON file
        form: PathBuf,
        /// Path to the values JSON file (object of field id to value)
        #[arg(long)]
        values: PathBuf,
        /// Reference date for age formulas (YYYY-MM-DD) [default: today, UTC]
        #[arg(long)]
        today: Option<String>,
    },

    /// Validate entered values against the form's rules
    Validate {
        /// Path to the form JSON file
        form: PathBuf,
        /// Path to the values JSON file (object of field id to value)
        #[arg(long)]
        values: PathBuf,
    },

    /// Check a single formula against a parent field type
    Formula {
        /// The formula text, e.g. "value * 2" or "age"
        formula: String,
        /// Type of the parent field (number, date, ...)
        #[arg(long)]
        parent_type: FieldType,
    },

    /// Save a form definition under a name (replacing any form of that name)
    Save {
        /// Path to the form JSON file
        form: PathBuf,
        /// Name to save the form under
        #[arg(long)]
        name: String,
    },

    /// List saved forms
    List,

    /// Print a saved form
    Show {
        /// Saved form id
        id: String,
    },

    /// Delete a saved form
    Delete {
        /// Saved form id
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, cli.output.unwrap_or(OutputFormat::Text), cli.quiet);
            process::exit(1);
        }
    };
    let output = cli
        .output
        .or(config.output.format)
        .unwrap_or(OutputFormat::Text);
    let quiet = cli.quiet;

    match cli.command {
        Commands::Check { form } => {
            commands::check::cmd_check(&form, output, quiet);
        }
        Commands::InitValues { form } => {
            commands::preview::cmd_init_values(&form, output, quiet);
        }
        Commands::Resolve {
            form,
            values,
            today,
        } => {
            let today = today.or_else(|| config.preview.today.clone());
            commands::preview::cmd_resolve(&form, &values, today.as_deref(), output, quiet);
        }
        Commands::Validate { form, values } => {
            commands::validate::cmd_validate(&form, &values, output, quiet);
        }
        Commands::Formula {
            formula,
            parent_type,
        } => {
            commands::formula::cmd_formula(&formula, parent_type, output, quiet);
        }
        Commands::Save { form, name } => {
            commands::store::cmd_save(&config.store_dir(), &form, &name, output, quiet);
        }
        Commands::List => {
            commands::store::cmd_list(&config.store_dir(), output, quiet);
        }
        Commands::Show { id } => {
            commands::store::cmd_show(&config.store_dir(), &id, output, quiet);
        }
        Commands::Delete { id } => {
            commands::store::cmd_delete(&config.store_dir(), &id, output, quiet);
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let fallback = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("serialization error: {}", e);
            process::exit(1);
        }
    }
}
