use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tradesort_core::format_cents;
use tradesort_ingest::detect_source;
use tradesort_report::{load_paths, read_document, ExportScope, Session, Totals};

mod config;
mod state;

use config::Config;

const LONG_VERSION: &str =
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("TRADESORT_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "tradesort",
    version,
    long_version = LONG_VERSION,
    about = "Merge broker 1099-B exports into one Form 8949 transaction list"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the detected broker for each file without extracting
    Detect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Load files and print per-file counts plus portfolio totals
    Summary {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load files and write the unified CSV (all three scopes unless --scope)
    Convert {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,

        /// Output directory (default: export.output_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Drop a loaded file by name before exporting (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Manage ~/.tradesort/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    All,
    Short,
    Long,
}

impl From<ScopeArg> for ExportScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => ExportScope::All,
            ScopeArg::Short => ExportScope::ShortTerm,
            ScopeArg::Long => ExportScope::LongTerm,
        }
    }
}

#[derive(Serialize)]
struct FileListing<'a> {
    filename: &'a str,
    source: &'static str,
    transactions: usize,
    skipped_rows: usize,
}

#[derive(Serialize)]
struct SummaryReport<'a> {
    files: Vec<FileListing<'a>>,
    totals: Totals,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    // `config` subcommands must still run when the file itself is broken.
    let tolerate = matches!(cli.command, Command::Config { .. });
    let (cfg, load_error) = config::or_defaults(config::load_config(), tolerate)?;
    init_tracing(&cfg.log.filter);
    if let Some(err) = load_error {
        warn!("{:#}; falling back to default config", err);
    }

    match cli.command {
        Command::Detect { files } => detect(&files, &cfg).await?,

        Command::Summary { files, json } => {
            let session = load_session(&files, &[], &cfg).await?;
            if json {
                let report = SummaryReport {
                    files: listings(&session),
                    totals: session.summary().totals,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(&session);
            }
        }

        Command::Convert {
            files,
            scope,
            out,
            exclude,
        } => {
            let session = load_session(&files, &exclude, &cfg).await?;
            let out_dir = out.unwrap_or_else(|| PathBuf::from(&cfg.export.output_dir));
            convert(&session, scope.map(ExportScope::from), out_dir, &cfg).await?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

fn init_tracing(configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn ensure_exist(files: &[PathBuf]) -> Result<()> {
    if let Some(missing) = files.iter().find(|p| !p.exists()) {
        bail!("file not found: {}", missing.display());
    }
    Ok(())
}

async fn detect(files: &[PathBuf], cfg: &Config) -> Result<()> {
    ensure_exist(files)?;
    for path in files {
        let doc = read_document(path, cfg.ingest.read_timeout()).await?;
        println!("{}\t{}", doc.name, detect_source(&doc.content));
    }
    Ok(())
}

async fn load_session(files: &[PathBuf], exclude: &[String], cfg: &Config) -> Result<Session> {
    ensure_exist(files)?;
    let mut session = Session::new();
    session.add_batch(load_paths(files, cfg.ingest.read_timeout()).await?);

    for name in exclude {
        if session.remove_file_named(name).is_none() {
            warn!(file = %name, "--exclude names a file that was not loaded");
        }
    }
    Ok(session)
}

fn listings(session: &Session) -> Vec<FileListing<'_>> {
    session
        .files()
        .iter()
        .map(|f| FileListing {
            filename: f.filename(),
            source: f.detected_source().label(),
            transactions: f.count(),
            skipped_rows: f.skipped_rows(),
        })
        .collect()
}

fn print_summary(session: &Session) {
    for file in listings(session) {
        print!("{:<40} {:<10} {:>5} transactions", file.filename, file.source, file.transactions);
        if file.skipped_rows > 0 {
            print!(" ({} rows skipped)", file.skipped_rows);
        }
        println!();
    }

    let totals = session.summary().totals;
    println!();
    println!(
        "Transactions: {} ({} short-term, {} long-term)",
        totals.transactions, totals.short_term, totals.long_term
    );
    println!("Total proceeds:   ${}", format_cents(totals.proceeds));
    println!("Total cost basis: ${}", format_cents(totals.cost_basis));
    println!("Net gain/loss:    ${}", format_cents(totals.gain_loss));
}

async fn convert(
    session: &Session,
    scope: Option<ExportScope>,
    out_dir: PathBuf,
    cfg: &Config,
) -> Result<()> {
    if session.transactions().is_empty() {
        bail!(
            "no transactions extracted from {} file(s); nothing to export",
            session.files().len()
        );
    }

    tokio::fs::create_dir_all(&out_dir)
        .await
        .with_context(|| format!("create {}", out_dir.display()))?;

    let scopes = match scope {
        Some(scope) => vec![scope],
        None => ExportScope::EVERY.to_vec(),
    };
    let explicit = scope.is_some();

    for scope in scopes {
        let selected = session.select(scope).len();
        if selected == 0 {
            if explicit {
                bail!("no transactions in scope {:?}; nothing to export", scope);
            }
            println!("Skipped {} (no transactions)", cfg.export.filename(scope));
            continue;
        }

        let path = out_dir.join(cfg.export.filename(scope));
        let bytes = session.export(scope)?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), transactions = selected, "wrote export");
        println!("Wrote {} ({} transactions)", path.display(), selected);
    }

    Ok(())
}
