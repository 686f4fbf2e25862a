use clap::{Parser, Subcommand};
use snap_sheet::audio::read_audio_info;
use snap_sheet::classify::{FileKind, classify};
use snap_sheet::context::Context;
use snap_sheet::paths::PathList;
use snap_sheet::thumbs::ThumbnailResolver;
use snap_sheet::{config, listing, output, sheet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn,snap_sheet=info";

#[derive(Parser)]
#[command(name = "snap-sheet")]
#[command(about = "Contact-sheet PDFs for directories of files")]
#[command(long_about = "\
Contact-sheet PDFs for directories of files

Every file in a directory becomes a cell with a thumbnail and its name,
35 cells to a Letter page. Images are shown as themselves, audio files by
their embedded cover art, and everything else by an icon for its kind.

  snap-sheet pdf ~/Music/albums ~/Pictures/2024 --output sheet.pdf

Directories appear in ascending path order, each starting on a new page.
Hidden files (dotfiles, *.bak by default) are left out.

Run 'snap-sheet gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

/// Flags shared by every command that touches the filesystem.
#[derive(clap::Args)]
struct GlobalArgs {
    /// Config file, layered over the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for cached icons (overrides `storage_dir`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one contact-sheet PDF from the given directories
    Pdf(PdfArgs),
    /// List the visible entries of a directory with their kinds
    List {
        /// Directory to list
        dir: PathBuf,
    },
    /// Show the kind, audio tags and thumbnail of files
    Info {
        /// Files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct PdfArgs {
    /// Directories to include; duplicates are ignored
    #[arg(required = true)]
    dirs: Vec<PathBuf>,

    /// Where to write the PDF
    #[arg(short, long)]
    output: PathBuf,

    /// Print the report as JSON instead of progress and a summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Pdf(args) => {
            let ctx = start(&cli.global)?;
            run_pdf(&ctx, args)?;
        }
        Command::List { dir } => {
            let ctx = start(&cli.global)?;
            let mut names = listing::list_directory(&dir, ctx.hidden())?;
            ctx.document().sort.sort(&mut names);
            let entries: Vec<(String, FileKind)> = names
                .into_iter()
                .map(|name| {
                    let kind = classify(&dir.join(&name));
                    (name, kind)
                })
                .collect();
            output::print_listing(&dir, &entries);
        }
        Command::Info { files } => {
            let ctx = start(&cli.global)?;
            let mut resolver = ThumbnailResolver::new(&ctx);
            for file in &files {
                let kind = classify(file);
                let audio = match kind {
                    FileKind::Audio => read_audio_info(file)
                        .inspect_err(|e| debug!(file = %file.display(), error = %e, "no tag"))
                        .ok(),
                    _ => None,
                };
                let dir = file.parent().unwrap_or(Path::new("."));
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let thumbnail = resolver.resolve(dir, &name);
                output::print_file_info(file, kind, audio.as_ref(), &thumbnail);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Logging, config and run context for commands that do real work.
fn start(global: &GlobalArgs) -> Result<Context, Box<dyn std::error::Error>> {
    init_logging(global.log_file.as_deref())?;
    let mut sheet_config = config::load_config(global.config.as_deref())?;
    if let Some(dir) = &global.storage_dir {
        sheet_config.storage_dir = Some(dir.clone());
    }
    let ctx = Context::from_config(&sheet_config)?;
    info!("{}", ctx);
    Ok(ctx)
}

fn run_pdf(ctx: &Context, args: PdfArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dirs = args
        .dirs
        .iter()
        .map(std::path::absolute)
        .collect::<Result<PathList, _>>()?;
    if dirs.is_empty() {
        return Err("no directories given".into());
    }

    let quiet = args.json;
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            if quiet {
                continue;
            }
            for line in output::format_sheet_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = sheet::generate_pdf(ctx, dirs.as_slice(), &args.output, Some(tx));
    printer.join().map_err(|_| "progress printer panicked")?;
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        output::print_report(&report, &args.output);
    }
    Ok(())
}

/// Install the global subscriber, writing to `log_file` when given.
fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            subscriber.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => subscriber.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
