//! tallyfile - Track per-file completion and render a weighted progress report.
//!
//! Usage:
//!   tally [PATH]                 Scan, update the ledger and write the report
//!   tally update [PATH]          Same, with report options
//!   tally status                 Show progress from the ledger without scanning
//!   tally mark ID -c 80 -m true  Record progress for one file
//!   tally prune [PATH]           Drop ledger entries for files that no longer exist
//!   tally --help                 Show help

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::parser::ValueSource;
use clap::{
    ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum,
};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use tallyfile_core::{IdentifierStyle, Ledger, ProgressReport, ScanConfig, merge, prune};
use tallyfile_report::{JsonRenderer, Renderer, TextRenderer, XlsxRenderer};
use tallyfile_scan::{Inventory, InventoryScanner};
use tallyfile_store::{DEFAULT_LEDGER_FILE, LedgerStore};

#[derive(Parser)]
#[command(
    name = "tallyfile",
    version,
    about = "Track per-file completion progress",
    long_about = "tallyfile measures the files in a source tree, keeps a ledger of \
                  hand-entered completion percentages, and reports size-weighted \
                  overall progress.\n\n\
                  Run `tally [PATH]` to rescan and refresh the report, or use \
                  subcommands to inspect and edit the ledger."
)]
struct Cli {
    #[command(flatten)]
    update: UpdateArgs,

    /// Ledger file
    #[arg(short, long, global = true, default_value = DEFAULT_LEDGER_FILE)]
    ledger: PathBuf,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan, merge into the ledger, save it and write the report
    Update(UpdateArgs),

    /// Show progress from the ledger without scanning
    Status {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Record hand-entered progress for one file
    Mark {
        /// Identifier as shown in the report
        identifier: String,

        /// Completion percentage (0-100)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
        completed: Option<u8>,

        /// Modified flag (true/false)
        #[arg(short, long, action = ArgAction::Set)]
        modified: Option<bool>,
    },

    /// Remove ledger entries whose files are no longer found
    Prune {
        #[command(flatten)]
        scan: ScanArgs,

        /// Show what would be removed without saving
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

#[derive(Args, Clone, Debug)]
struct ScanArgs {
    /// Root of the tree to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Tracked file extension (repeatable)
    #[arg(short, long = "ext", default_value = "java")]
    extensions: Vec<String>,

    /// How identifiers are derived: "stem" (file name) or "path" (relative path)
    #[arg(long, default_value = "stem")]
    identifiers: IdentifierStyle,

    /// Glob pattern to ignore (repeatable)
    #[arg(short, long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Skip hidden files and directories
    #[arg(long)]
    skip_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// Maximum directory depth
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Scanner threads (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

impl ScanArgs {
    fn to_config(&self) -> Result<ScanConfig> {
        let config = ScanConfig::builder()
            .root(self.path.clone())
            .extensions(self.extensions.clone())
            .identifier_style(self.identifiers)
            .ignore_patterns(self.ignore_patterns.clone())
            .include_hidden(!self.skip_hidden)
            .follow_symlinks(self.follow_symlinks)
            .max_depth(self.max_depth)
            .threads(self.threads)
            .build()
            .context("Invalid scan options")?;
        Ok(config)
    }
}

#[derive(Args, Clone, Debug)]
struct UpdateArgs {
    #[command(flatten)]
    scan: ScanArgs,

    /// Report file (defaults to percent_complete.<format>)
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, default_value = "xlsx")]
    format: ReportFormat,

    /// Skip writing the report
    #[arg(long)]
    no_report: bool,

    /// Scan and report without saving the ledger
    #[arg(short = 'n', long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ReportFormat {
    #[default]
    Xlsx,
    Text,
    Json,
}

impl ReportFormat {
    fn default_path(self) -> PathBuf {
        match self {
            Self::Xlsx => PathBuf::from(tallyfile_report::DEFAULT_REPORT_FILE),
            Self::Text => PathBuf::from("percent_complete.txt"),
            Self::Json => PathBuf::from("percent_complete.json"),
        }
    }

    fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Xlsx => Box::new(XlsxRenderer::new()),
            Self::Text => Box::new(TextRenderer::new()),
            Self::Json => Box::new(JsonRenderer::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let matches = Cli::command().get_matches();
    if let Some(flag) = misplaced_update_flag(&matches) {
        bail!("{flag} belongs to `update`; pass it after `update` or without a subcommand");
    }
    let cli = Cli::from_arg_matches(&matches)?;
    init_tracing(cli.verbose);

    let store = LedgerStore::new(&cli.ledger);

    match cli.command {
        Some(Command::Update(args)) => run_update(&store, &args)?,
        Some(Command::Status { format, no_color }) => run_status(&store, format, no_color)?,
        Some(Command::Mark {
            identifier,
            completed,
            modified,
        }) => run_mark(&store, &identifier, completed, modified)?,
        Some(Command::Prune { scan, dry_run }) => run_prune(&store, &scan, dry_run)?,
        None => run_update(&store, &cli.update)?,
    }

    Ok(())
}

/// Find an update option given on the command line together with a subcommand.
///
/// The top-level form shares its options with `update`, so `tally -e rs status`
/// would otherwise drop `-e` without a word.
fn misplaced_update_flag(matches: &ArgMatches) -> Option<String> {
    matches.subcommand_name()?;
    UpdateArgs::augment_args(clap::Command::new("update"))
        .get_arguments()
        .find(|arg| {
            matches.value_source(arg.get_id().as_str()) == Some(ValueSource::CommandLine)
        })
        .map(|arg| match arg.get_long() {
            Some(long) => format!("--{long}"),
            None => arg.get_id().as_str().to_uppercase(),
        })
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Scan the tree and report any non-fatal warnings.
fn scan_inventory(args: &ScanArgs) -> Result<Inventory> {
    let config = args.to_config()?;

    eprintln!("Scanning {}...", config.root.display());

    let inventory = InventoryScanner::new()
        .scan(&config)
        .context("Scan failed")?;

    for warning in &inventory.warnings {
        tracing::warn!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    }
    tracing::info!(
        files = inventory.files.len(),
        lines = inventory.total_lines(),
        elapsed_ms = inventory.scan_duration.as_millis() as u64,
        "scan finished"
    );

    Ok(inventory)
}

/// Scan, merge, persist, aggregate and render.
fn run_update(store: &LedgerStore, args: &UpdateArgs) -> Result<()> {
    let inventory = scan_inventory(&args.scan)?;

    let prior = load_ledger(store)?;
    let (ledger, summary) = merge(&inventory.entries(), prior).context("Merge failed")?;

    for identifier in &summary.added {
        tracing::info!(%identifier, "now tracking");
    }
    if !summary.missing.is_empty() {
        tracing::warn!(
            count = summary.missing.len(),
            "tracked files not found in this scan were kept: {}",
            summary.missing.join(", ")
        );
    }

    if args.dry_run {
        eprintln!("Dry run: ledger not saved");
    } else {
        store
            .save(&ledger)
            .with_context(|| format!("Failed to save ledger {}", store.path().display()))?;
    }

    let report = ProgressReport::from_ledger(&ledger).context("Cannot compute progress")?;
    println!("{:.2}% completed.", report.overall_percent());

    if !args.no_report {
        let output = args
            .report
            .clone()
            .unwrap_or_else(|| args.format.default_path());
        render(args.format.renderer().as_ref(), &report, &output)?;
        eprintln!("Report written to {}", output.display());
    }

    Ok(())
}

/// Print progress from the ledger alone.
fn run_status(store: &LedgerStore, format: OutputFormat, no_color: bool) -> Result<()> {
    let ledger = load_ledger(store)?;
    let report = ProgressReport::from_ledger(&ledger).context("Cannot compute progress")?;

    let stdout = std::io::stdout();
    let color = !no_color && stdout.is_terminal();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Text => {
            TextRenderer::new()
                .with_color(color)
                .write_to(&report, &mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonRenderer::new()
                .write_to(&report, &mut out)
                .context("Failed to write report")?;
        }
    }

    Ok(())
}

/// Edit the hand-entered fields of one record.
fn run_mark(
    store: &LedgerStore,
    identifier: &str,
    completed: Option<u8>,
    modified: Option<bool>,
) -> Result<()> {
    if completed.is_none() && modified.is_none() {
        bail!("Nothing to change: pass --completed and/or --modified");
    }

    let mut ledger = load_ledger(store)?;
    let record = ledger
        .annotate(identifier, completed, modified)
        .context("Cannot update progress")?;
    println!(
        "{}: {}% complete{}",
        record.identifier,
        record.completed,
        if record.modified { ", modified" } else { "" }
    );

    store
        .save(&ledger)
        .with_context(|| format!("Failed to save ledger {}", store.path().display()))?;
    Ok(())
}

/// Drop ledger entries for files the scan no longer finds.
fn run_prune(store: &LedgerStore, args: &ScanArgs, dry_run: bool) -> Result<()> {
    let inventory = scan_inventory(args)?;
    let ledger = load_ledger(store)?;

    let (pruned, removed) = prune(ledger, inventory.identifiers());

    if removed.is_empty() {
        println!("Nothing to prune.");
        return Ok(());
    }

    for identifier in &removed {
        println!("  {identifier}");
    }

    if dry_run {
        println!("Would remove {} entries (dry run)", removed.len());
    } else {
        store
            .save(&pruned)
            .with_context(|| format!("Failed to save ledger {}", store.path().display()))?;
        println!("Removed {} entries", removed.len());
    }

    Ok(())
}

fn load_ledger(store: &LedgerStore) -> Result<Ledger> {
    store
        .load()
        .with_context(|| format!("Failed to load ledger {}", store.path().display()))
}

fn render(renderer: &dyn Renderer, report: &ProgressReport, output: &Path) -> Result<()> {
    renderer
        .render(report, output)
        .with_context(|| format!("Failed to write report {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_path_runs_update() {
        let cli = parse(&["tally", "src"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.update.scan.path, PathBuf::from("src"));
    }

    #[test]
    fn test_verbose_before_subcommand() {
        let cli = parse(&["tally", "-v", "status"]);
        assert_eq!(cli.verbose, 1);
        assert!(matches!(
            cli.command,
            Some(Command::Status {
                format: OutputFormat::Text,
                no_color: false
            })
        ));
    }

    #[test]
    fn test_ledger_before_subcommand() {
        let cli = parse(&["tally", "-l", "progress.json", "mark", "Room", "-c", "10"]);
        assert_eq!(cli.ledger, PathBuf::from("progress.json"));
        match cli.command {
            Some(Command::Mark {
                identifier,
                completed,
                modified,
            }) => {
                assert_eq!(identifier, "Room");
                assert_eq!(completed, Some(10));
                assert_eq!(modified, None);
            }
            other => panic!("expected mark, got {other:?}"),
        }
    }

    #[test]
    fn test_ledger_after_subcommand() {
        let cli = parse(&["tally", "status", "-l", "progress.json"]);
        assert_eq!(cli.ledger, PathBuf::from("progress.json"));
        assert!(matches!(cli.command, Some(Command::Status { .. })));
    }

    #[test]
    fn test_update_flag_before_subcommand_is_reported() {
        let matches = Cli::command()
            .try_get_matches_from(["tally", "-e", "rs", "status"])
            .unwrap();
        assert_eq!(misplaced_update_flag(&matches).as_deref(), Some("--ext"));

        let matches = Cli::command()
            .try_get_matches_from(["tally", "-v", "-l", "progress.json", "status"])
            .unwrap();
        assert_eq!(misplaced_update_flag(&matches), None);

        let matches = Cli::command()
            .try_get_matches_from(["tally", "-e", "rs", "src"])
            .unwrap();
        assert_eq!(misplaced_update_flag(&matches), None);
    }

    #[test]
    fn test_completed_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["tally", "mark", "Room", "-c", "101"]).is_err());
    }
}
