mod renderer;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wheel_pick_core::PickerConfig;
use wheel_pick_core::datetime::{DateTimeForm, Locale};
use wheel_pick_core::engine::SystemClock;
use wheel_pick_core::report::{MemStore, ReportStore};

/// Pick the date and time of an alert with scroll wheels.
#[derive(Debug, Parser)]
#[command(name = "wheel-pick", version)]
struct Args {
    /// Picker geometry and momentum tuning (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file. `RUST_LOG` sets the filter.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Month names and labels: `es` or `en`.
    #[arg(long, default_value = "es")]
    locale: Locale,

    /// Save the reports filed in this session as JSON on exit.
    #[arg(long)]
    reports: Option<PathBuf>,
}

fn init_logging(path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn load_config(path: Option<&Path>) -> Result<PickerConfig> {
    let Some(path) = path else {
        return Ok(PickerConfig::default());
    };
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    PickerConfig::from_json(&data).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    // The terminal belongs to the UI; logs only go to a file.
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let config = load_config(args.config.as_deref())?;
    let now = Local::now().naive_local();
    let mut form = DateTimeForm::new(now, args.locale, config, SystemClock::new())?;
    let mut store = MemStore::new();
    info!(locale = ?args.locale, summary = %form.summary(), "form opened");

    renderer::run(&mut form, &mut store)?;

    let mut out = std::io::stdout().lock();
    for report in store.list() {
        writeln!(out, "{}  {}", report.id, report.event_date.to_rfc3339())?;
    }
    if let Some(path) = &args.reports {
        store
            .save_json(path)
            .with_context(|| format!("saving reports to {}", path.display()))?;
        info!(count = store.len(), path = %path.display(), "reports saved");
    }
    Ok(())
}
