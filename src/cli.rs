//! CLI argument parsing for reel packing.
//!
//! Commands map one-to-one onto library entry points; defaults live in the
//! engine config, not here.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "reelpack",
    version,
    about = "Fill timeline windows with non-repeating cuts from categorized source media",
    after_help = "Commands:\n  windows --records <csv>                    List target windows parsed from a timeline export\n  pack --records <csv> --catalog <json>      Fill every window and write an edit list\n  fill --catalog <json> --category <name>    Fill a single window\n  merge --records <csv> --labels <txt>       Attach one label per row\n  scan --resource-dir <dir>                  Build a catalog manifest from folders\n  config                                     Print the default engine config\n\nExamples:\n  reelpack merge --records export.csv --labels labels.txt\n  reelpack scan --resource-dir ./media --default-length 30 --ext mp4 > catalog.json\n  reelpack pack --records export_merged.csv --catalog catalog.json --out edits.json\n  reelpack fill --catalog catalog.json --category Cat --start 10 --end 14 --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log per-placement detail to stderr (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Windows(WindowsArgs),
    Pack(PackArgs),
    Fill(FillArgs),
    Merge(MergeArgs),
    Scan(ScanArgs),
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Parse a timeline export and list its target windows")]
pub struct WindowsArgs {
    /// Timeline export CSV (startSeconds, endSeconds, textContent, ...)
    #[arg(long, value_name = "CSV")]
    pub records: PathBuf,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Engine and output options shared by `pack` and `fill`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Catalog manifest JSON describing categories and their items
    #[arg(long, value_name = "JSON")]
    pub catalog: PathBuf,

    /// Engine config JSON (defaults to the user config dir, then built-ins)
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Seed for a reproducible run (overrides the config seed)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Write the edit list as JSON
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Write the edit list as CSV
    #[arg(long, value_name = "PATH")]
    pub out_csv: Option<PathBuf>,

    /// Print the run report as JSON instead of a summary line
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Fill every window of a timeline export")]
pub struct PackArgs {
    /// Timeline export CSV (startSeconds, endSeconds, textContent, ...)
    #[arg(long, value_name = "CSV")]
    pub records: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Fill a single window from one category")]
pub struct FillArgs {
    /// Category label (whitespace is folded to underscores)
    #[arg(long, value_name = "NAME")]
    pub category: String,

    /// Window start on the output timeline, in seconds
    #[arg(long, value_name = "SECS")]
    pub start: f64,

    /// Window end on the output timeline, in seconds
    #[arg(long, value_name = "SECS")]
    pub end: f64,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Write a copy of a timeline export with one label per row")]
pub struct MergeArgs {
    /// Timeline export CSV
    #[arg(long, value_name = "CSV")]
    pub records: PathBuf,

    /// Text file with one label per line
    #[arg(long, value_name = "TXT")]
    pub labels: PathBuf,

    /// Output CSV (defaults to <records stem>_merged.csv)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Build a catalog manifest from a directory of category folders")]
pub struct ScanArgs {
    /// Directory whose immediate sub-directories are categories
    #[arg(long, value_name = "DIR")]
    pub resource_dir: PathBuf,

    /// Usable length assigned to every scanned item, in seconds
    #[arg(long, value_name = "SECS")]
    pub default_length: f64,

    /// Only include files with this extension (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Write the manifest here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Print the engine config as JSON")]
pub struct ConfigArgs {
    /// Print the config a run would resolve instead of the defaults
    #[arg(long)]
    pub resolved: bool,

    /// Engine config JSON to resolve (implies --resolved)
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}
