//! CLI argument definitions for the chemref tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "chemref",
    version,
    about = "Curated chemical reference data: periodic table, AutoDock atom types, PDB CCD",
    long_about = "Access and regenerate the bundled chemical reference datasets.\n\n\
                  Accessors read parquet/JSON files from the data directory;\n\
                  the update subcommand rebuilds them from their upstream sources."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data directory (default: $CHEMREF_DATA_DIR, else the bundled data/).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a dataset to stdout.
    #[command(subcommand)]
    Get(GetCommand),

    /// Regenerate datasets from their upstream sources.
    Update(UpdateArgs),

    /// List the supported CCD categories.
    Categories,
}

#[derive(Subcommand)]
pub enum GetCommand {
    /// The periodic table of chemical elements.
    PeriodicTable,

    /// The AutoDock atom-type table.
    AutodockTypes,

    /// A table of the curated Chemical Component Dictionary.
    Ccd(CcdArgs),
}

#[derive(Parser)]
pub struct CcdArgs {
    /// CCD category, e.g. chem_comp or chem_comp_atom.
    #[arg(long = "category", value_name = "NAME", default_value = "chem_comp")]
    pub category: String,

    /// Component ids to filter by (case-insensitive, repeatable).
    #[arg(long = "comp-id", value_name = "ID")]
    pub comp_ids: Vec<String>,

    /// Partition to read.
    #[arg(long = "variant", value_enum, default_value = "any")]
    pub variant: VariantArg,

    /// Regenerate the CCD files first if they are missing.
    #[arg(long = "ensure")]
    pub ensure: bool,
}

#[derive(Parser)]
pub struct UpdateArgs {
    /// Which pipelines to run.
    #[arg(value_enum, default_value = "all")]
    pub target: UpdateTarget,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UpdateTarget {
    Atom,
    Pdb,
    All,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum VariantArg {
    Aa,
    NonAa,
    Any,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
