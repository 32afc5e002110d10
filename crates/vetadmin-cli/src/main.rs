use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use vetadmin_core::store::HttpStore;
use vetadmin_core::{
    ActionKind, ArchiveScreen, Config, Overall, RecordScope, ScreenError, SelectionKey,
    config_file, resolve_table,
};

mod output;

use output::ColorMode;

/// Vet clinic admin tool - batch archive, restore and delete across backend tables
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List records grouped by table
    List {
        /// Show archived records instead of live ones
        #[arg(long)]
        archived: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Backend base URL (overrides config file and VETADMIN_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Archive live records
    Archive(BatchArgs),

    /// Restore archived records
    Restore(BatchArgs),

    /// Permanently delete archived records
    Delete(BatchArgs),
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Selection keys like "brands-3"
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Group labels or table names to select entirely, e.g. "Brand"
    #[arg(long, value_delimiter = ',')]
    groups: Vec<String>,

    /// Select every record of every group
    #[arg(long)]
    all: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Backend base URL (overrides config file and VETADMIN_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Write a report of the run (.json, .csv, anything else plain text)
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::List {
            archived,
            no_color,
            base_url,
        } => list(archived, no_color, base_url).await,
        Command::Archive(args) => run_batch(ActionKind::Archive, RecordScope::Live, args).await,
        Command::Restore(args) => run_batch(ActionKind::Restore, RecordScope::Archived, args).await,
        Command::Delete(args) => run_batch(ActionKind::Delete, RecordScope::Archived, args).await,
    }
}

/// Resolve configuration: CLI flag > env var > config file > defaults.
fn build_config(base_url: Option<String>) -> Config {
    let mut config = config_file::load_config().into_config();
    if let Ok(url) = std::env::var("VETADMIN_BASE_URL") {
        config.base_url = url;
    }
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Ok(secs) = std::env::var("VETADMIN_TIMEOUT")
        && let Ok(secs) = secs.parse()
    {
        config.request_timeout_secs = secs;
    }
    config
}

async fn list(archived: bool, no_color: bool, base_url: Option<String>) -> anyhow::Result<()> {
    let config = build_config(base_url);
    let store = Arc::new(HttpStore::new(&config));
    let scope = if archived {
        RecordScope::Archived
    } else {
        RecordScope::Live
    };

    let mut screen = ArchiveScreen::new(store, scope);
    screen.refresh().await?;

    let color = ColorMode(!no_color);
    let mut stdout = std::io::stdout();
    output::print_groups(&mut stdout, screen.groups(), color)?;
    Ok(())
}

async fn run_batch(action: ActionKind, scope: RecordScope, args: BatchArgs) -> anyhow::Result<()> {
    if args.keys.is_empty() && args.groups.is_empty() && !args.all {
        anyhow::bail!("nothing selected: pass --keys, --groups or --all");
    }

    let config = build_config(args.base_url.clone());
    let store = Arc::new(HttpStore::new(&config));
    let mut screen = ArchiveScreen::new(store, scope);
    screen.refresh().await?;

    let color = ColorMode(!args.no_color);

    if args.all {
        screen.toggle_select_all();
    }
    for label in &args.groups {
        // Group labels resolve to table identifiers, but a fetch may tag
        // groups with the raw label; try both before giving up.
        let resolved = resolve_table(label).to_string();
        if !screen.toggle_group(&resolved) && !screen.toggle_group(label) {
            tracing::warn!(label = label.as_str(), "no such group in the working set");
        }
    }
    for raw in &args.keys {
        match raw.parse::<SelectionKey>() {
            Ok(key) => screen.toggle_record(&key.table, key.id),
            Err(e) => tracing::warn!(key = raw.as_str(), error = %e, "skipping malformed key"),
        }
    }

    if screen.selection().is_empty() {
        anyhow::bail!("nothing valid selected");
    }

    let tables: BTreeSet<&str> = screen
        .selection()
        .keys()
        .iter()
        .map(|k| resolve_table(&k.table))
        .collect();

    let pb = ProgressBar::new(tables.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner} {pos}/{len} tables {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message(format!("({})", action));

    let on_table_complete = {
        let pb = pb.clone();
        move |outcome: &vetadmin_core::BatchOutcome| {
            pb.println(output::outcome_line(outcome, color));
            pb.inc(1);
        }
    };

    let batch = match screen.confirm(action, Some(&on_table_complete)).await {
        Ok(batch) => batch,
        Err(e @ ScreenError::NothingSelected) => {
            pb.finish_and_clear();
            anyhow::bail!(e);
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };
    pb.finish_and_clear();

    let mut stdout = std::io::stdout();
    output::print_batch_summary(&mut stdout, &batch, action, color)?;

    if let Some(ref path) = args.report {
        vetadmin_reporting::export_batch(&batch, action, path)
            .map_err(|e| anyhow::anyhow!(e))?;
        println!("Report written to {}", path.display());
    }

    if batch.outcome.overall == Overall::PartialFailure {
        std::process::exit(1);
    }
    Ok(())
}
