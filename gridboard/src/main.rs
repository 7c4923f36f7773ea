use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use gridboard_core::{Clock, Dashboard, DashboardConfig, FixedClock, SystemClock, ZeroPolicy};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

mod formatter;

#[derive(Parser)]
#[command(name = "gridboard")]
#[command(about = "Hourly grid frequency and demand dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the monthly workbooks
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Panels to show
    #[arg(short, long, value_enum, default_value = "all")]
    view: View,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Reference date (YYYY-MM-DD) instead of today
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Current hour (0-23) used to hide readings not yet taken
    #[arg(long, value_name = "HOUR", value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,

    /// How zero readings are treated
    #[arg(long, value_enum)]
    zero_policy: Option<ZeroPolicyArg>,

    /// Re-read workbooks on every render
    #[arg(long)]
    no_cache: bool,

    /// Re-render every refresh interval until interrupted
    #[arg(short, long)]
    watch: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Today's demand and frequency against the previous day
    Today,
    /// Both tables for the whole month
    Month,
    /// Units currently online
    Units,
    /// Everything
    All,
}

impl View {
    pub fn shows(self, other: View) -> bool {
        self == View::All || self == other
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON output
    Json,
}

#[derive(Clone, ValueEnum)]
enum ZeroPolicyArg {
    /// Zero means no reading yet
    Missing,
    /// Zero is a real reading
    Valid,
}

impl From<ZeroPolicyArg> for ZeroPolicy {
    fn from(arg: ZeroPolicyArg) -> Self {
        match arg {
            ZeroPolicyArg::Missing => ZeroPolicy::Missing,
            ZeroPolicyArg::Valid => ZeroPolicy::Valid,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON on stdout stays parseable
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dir) = &cli.dir {
        config.data_dir = dir.clone();
    }
    if let Some(policy) = cli.zero_policy.clone() {
        config.zero_policy = policy.into();
    }
    if cli.no_cache {
        config.cache = false;
    }

    config.validate().context("Invalid configuration")?;
    let tz = config.tz()?;

    let mut dashboard = Dashboard::from_config(&config)
        .with_context(|| format!("Failed to set up dashboard for {}", config.data_dir.display()))?;

    info!(dir = %config.data_dir.display(), watch = cli.watch, "starting dashboard");
    loop {
        // Without --date the pinned hour follows the calendar across watch ticks
        if let Some(hour) = cli.hour {
            let clock = pinned_clock(tz, cli.date, hour)?;
            dashboard = dashboard.with_clock(Box::new(clock));
        }

        let snapshot = match (cli.date, cli.hour) {
            (Some(date), None) => dashboard.render_for(date),
            _ => dashboard.render(),
        };

        match cli.format {
            OutputFormat::Human => formatter::print_human(&snapshot, cli.view),
            OutputFormat::Json => formatter::print_json(&snapshot, cli.view)?,
        }

        if !cli.watch {
            break;
        }
        debug!(secs = config.refresh_interval_secs, "waiting for next refresh");
        std::thread::sleep(config.refresh_interval());
    }

    Ok(())
}

/// Clock frozen at `hour` on `date`, or on today's date in `tz`
fn pinned_clock(tz: Tz, date: Option<NaiveDate>, hour: u32) -> Result<FixedClock> {
    let date = date.unwrap_or_else(|| SystemClock::new(tz).now().date_naive());
    let local = date.and_hms_opt(hour, 0, 0).context("Invalid hour")?;
    FixedClock::at_local(tz, local).with_context(|| format!("{} does not exist in {}", local, tz))
}

fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    if let Some(config_path) = path {
        return DashboardConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()));
    }

    // Try to load default config from current directory if it exists
    let default_config_path = PathBuf::from("gridboard.toml");
    if default_config_path.exists() {
        DashboardConfig::from_file(&default_config_path).with_context(|| {
            format!(
                "Failed to load config from {}",
                default_config_path.display()
            )
        })
    } else {
        Ok(DashboardConfig::default())
    }
}
