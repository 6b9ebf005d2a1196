//! wrfcmaq-prep - summarize WRF-CMAQ output as air-quality model inputs.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wrfcmaq_prep::config::{DEFAULT_FILE_INTERVAL, DEFAULT_RECORD_INTERVAL};
use wrfcmaq_prep::progress::TracingProgress;
use wrfcmaq_prep::{GridProducer, GridStats, Preprocessor, PreprocessorConfig, Quantity};

#[derive(Parser, Debug)]
#[command(name = "wrfcmaq-prep")]
#[command(about = "Stream WRF-CMAQ output as standardized air-quality model inputs", long_about = None)]
struct Args {
    /// Path template of the source files; [DATE] is replaced by YYYY-MM-DD
    #[arg(long, required_unless_present = "list")]
    source: Option<String>,

    /// First simulation day (YYYYMMDD)
    #[arg(long, required_unless_present = "list")]
    start: Option<String>,

    /// Day the simulation stops, exclusive (YYYYMMDD)
    #[arg(long, required_unless_present = "list")]
    end: Option<String>,

    /// Time between records
    #[arg(long, default_value = DEFAULT_RECORD_INTERVAL)]
    record_interval: String,

    /// Time covered by one file
    #[arg(long, default_value = DEFAULT_FILE_INTERVAL)]
    file_interval: String,

    /// Quantity to summarize (repeatable; default: all)
    #[arg(long = "quantity", short = 'q')]
    quantities: Vec<Quantity>,

    /// List quantities and their units, then exit
    #[arg(long)]
    list: bool,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_ref())?;

    if args.list {
        for q in Quantity::ALL {
            println!("{:<20} {}", q.name(), q.units());
        }
        return Ok(());
    }

    let (Some(source), Some(start), Some(end)) = (&args.source, &args.start, &args.end) else {
        anyhow::bail!("--source, --start and --end are required");
    };
    let config = PreprocessorConfig::new(source.as_str(), start, end)
        .and_then(|c| c.with_intervals(&args.record_interval, &args.file_interval))
        .context("Invalid preprocessor configuration")?;

    tracing::info!("Starting wrfcmaq-prep for {}", config.source());
    let prep = Preprocessor::open(config).with_progress(TracingProgress);

    let nx = prep.nx().context("Failed to read grid width")?;
    let ny = prep.ny().context("Failed to read grid height")?;
    let nz = prep.nz().context("Failed to read layer count")?;
    println!("grid: nx={} ny={} nz={}", nx, ny, nz);

    let quantities = if args.quantities.is_empty() {
        Quantity::ALL.to_vec()
    } else {
        args.quantities.clone()
    };

    for quantity in quantities {
        summarize(&prep, quantity)?;
    }

    tracing::info!("wrfcmaq-prep finished");
    Ok(())
}

fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    // Set up logging to a file if --log is provided, else stderr filtered by RUST_LOG
    if let Some(log_path) = log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn summarize<R>(prep: &Preprocessor<R>, quantity: Quantity) -> Result<()>
where
    R: wrfcmaq_prep::data::GridReader + 'static,
{
    println!("\n{} [{}]", quantity.name(), quantity.units());
    let mut stream = prep.stream(quantity);
    while let Some(grid) = stream.next() {
        let grid = grid.with_context(|| format!("Failed to read {}", quantity))?;
        let stats = GridStats::of(&grid);
        let time = stream
            .timestamp()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        match (stats.min_max, stats.mean) {
            (Some((min, max)), Some(mean)) => println!(
                "  {} {:?} min={:.4e} max={:.4e} mean={:.4e} std={:.4e} valid={}",
                time,
                grid.shape(),
                min,
                max,
                mean,
                stats.std.unwrap_or(0.0),
                stats.valid_count
            ),
            _ => println!("  {} {:?} no valid values", time, grid.shape()),
        }
    }
    Ok(())
}
