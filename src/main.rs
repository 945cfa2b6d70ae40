use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reel_pack::alloc::{Packer, RunReport};
use reel_pack::catalog::{load_manifest, scan_resource_dir, ScanOptions};
use reel_pack::config::{config_stub, resolve_config};
use reel_pack::edit_list::EditList;
use reel_pack::staging::{write_output_json, write_output_text};
use reel_pack::timeline::{
    default_merged_path, merge_labels, normalize_category, parse_windows, read_labels,
    read_record_file, RowRejection, TargetWindow,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{Command, ConfigArgs, FillArgs, MergeArgs, PackArgs, RunArgs, ScanArgs, WindowsArgs};

fn main() -> Result<()> {
    let args = cli::RootArgs::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Windows(args) => cmd_windows(args),
        Command::Pack(args) => cmd_pack(args),
        Command::Fill(args) => cmd_fill(args),
        Command::Merge(args) => cmd_merge(args),
        Command::Scan(args) => cmd_scan(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("reel_pack={level},reelpack={level}"))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_windows(args: WindowsArgs) -> Result<()> {
    let records = read_record_file(&args.records)?;
    let parsed = parse_windows(&records)
        .with_context(|| format!("parse {}", args.records.display()))?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }
    for window in &parsed.windows {
        println!(
            "{:>5}  {:>10.3}  {:>10.3}  {}",
            window.row, window.start, window.end, window.category
        );
    }
    println!(
        "{} windows, {} rows dropped",
        parsed.windows.len(),
        parsed.rejected.len()
    );
    Ok(())
}

/// Pack report plus the rows that never became windows.
#[derive(Serialize)]
struct PackSummary<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    rejected_rows: &'a [RowRejection],
}

fn cmd_pack(args: PackArgs) -> Result<()> {
    let records = read_record_file(&args.records)?;
    let parsed = parse_windows(&records)
        .with_context(|| format!("parse {}", args.records.display()))?;
    let report = run_packer(&parsed.windows, &args.run, false)?;
    if args.run.json {
        let summary = PackSummary {
            report: &report,
            rejected_rows: &parsed.rejected,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&report, parsed.rejected.len());
    }
    Ok(())
}

fn cmd_fill(args: FillArgs) -> Result<()> {
    let category = normalize_category(&args.category);
    if category.is_empty() {
        return Err(anyhow!("category must not be empty"));
    }
    if !(args.start.is_finite() && args.end.is_finite()) || args.start < 0.0 {
        return Err(anyhow!(
            "window bounds must be finite and non-negative (got {}..{})",
            args.start,
            args.end
        ));
    }
    if args.end <= args.start {
        return Err(anyhow!(
            "window end {} is not after start {}",
            args.end,
            args.start
        ));
    }
    let window = TargetWindow {
        start: args.start,
        end: args.end,
        category,
        name: "Clip".to_string(),
        row: 1,
    };
    let report = run_packer(std::slice::from_ref(&window), &args.run, true)?;
    if args.run.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, 0);
    }
    match report.skipped.first() {
        Some(skipped) => Err(anyhow!(
            "window {}..{} not filled: {}",
            window.start,
            window.end,
            skipped.detail
        )),
        None => Ok(()),
    }
}

/// Resolve config and catalog, fill `windows`, then write the edit list.
fn run_packer(windows: &[TargetWindow], args: &RunArgs, single: bool) -> Result<RunReport> {
    let mut config = resolve_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let catalog = load_manifest(&args.catalog)?;
    let settings = if single {
        config.fill_settings()
    } else {
        config.pack_settings()
    };
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(
        windows = windows.len(),
        categories = catalog.categories.len(),
        seed = ?config.seed,
        "packing"
    );

    let mut packer = Packer::new(settings, rng);
    let mut edits = EditList::new();
    let report = packer.run(windows, &catalog, &mut edits);

    if let Some(path) = &args.out {
        write_output_json(path, &edits)?;
        tracing::info!(path = %path.display(), entries = edits.len(), "wrote edit list");
    }
    if let Some(path) = &args.out_csv {
        write_output_text(path, &edits.to_csv())?;
        tracing::info!(path = %path.display(), entries = edits.len(), "wrote edit list CSV");
    }
    Ok(report)
}

fn print_summary(report: &RunReport, dropped_rows: usize) {
    println!(
        "filled {}/{} windows with {} placements ({} forced), {} skipped, {} rows dropped",
        report.windows_processed,
        report.windows_total,
        report.placements,
        report.forced_fallbacks,
        report.skipped.len(),
        dropped_rows
    );
    for skipped in &report.skipped {
        println!(
            "  row {} [{}] {}: {}",
            skipped.row, skipped.category, skipped.reason, skipped.detail
        );
    }
}

fn cmd_merge(args: MergeArgs) -> Result<()> {
    let records = read_record_file(&args.records)?;
    let labels = read_labels(&args.labels)?;
    if labels.len() != records.rows.len() {
        tracing::warn!(
            rows = records.rows.len(),
            labels = labels.len(),
            "label count does not match row count"
        );
    }
    let merged = merge_labels(&records, &labels);
    let out = args
        .out
        .unwrap_or_else(|| default_merged_path(&args.records));
    write_output_text(&out, &merged.to_csv())?;
    println!("{}", out.display());
    Ok(())
}

fn cmd_scan(args: ScanArgs) -> Result<()> {
    let options = ScanOptions {
        default_length: args.default_length,
        extensions: args
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect(),
    };
    let manifest = scan_resource_dir(&args.resource_dir, &options)?;
    match &args.out {
        Some(path) => {
            write_output_json(path, &manifest)?;
            println!("{}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&manifest)?),
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> Result<()> {
    if args.resolved || args.config.is_some() {
        let config = resolve_config(args.config.as_deref())?;
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", config_stub()?);
    }
    Ok(())
}
