//! TotoBin hardware agent entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  GpioHardware      HttpRemote     SystemClock  LogEventSink  │
//! │  (LinePort)        (RemotePort)   (ClockPort)  (EventSink)   │
//! │                                                              │
//! │  ─────────────────── Port Trait Boundary ─────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  Scheduler ──▶ BrewSequencer ──▶ HardwareSession       │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `totobin-agent [config.json]`.  The config path may also come
//! from `TOTOBIN_CONFIG`; environment variables override file values.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use totobin_agent::adapters::http::HttpRemote;
use totobin_agent::adapters::linux_gpio;
use totobin_agent::adapters::log_sink::LogEventSink;
use totobin_agent::adapters::time::SystemClock;
use totobin_agent::app::ports::LinePort;
use totobin_agent::config::AgentConfig;
use totobin_agent::scheduler::Scheduler;

const ENV_CONFIG: &str = "TOTOBIN_CONFIG";

fn main() -> Result<()> {
    let config = load_config()?;
    let file_log_error = init_logging(config.log_file.as_deref());

    info!("========================================");
    info!("  TotoBin hardware agent v{}", env!("CARGO_PKG_VERSION"));
    info!("  hardware id: {}", config.hardware_id);
    info!("========================================");
    if let Some(e) = file_log_error {
        warn!("File logging disabled: {}", e);
    }
    info!("API: {}", config.base_url);

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
            .context("failed to install signal handler")?;
    }

    let mut hw = linux_gpio::open(&config.lines).context("GPIO initialisation failed")?;
    match hw.read_sensor() {
        Ok(level) => info!("Sensor line {} reads {}", config.lines.sensor, if level { "high" } else { "low" }),
        Err(e) => warn!("Sensor read failed: {}", e),
    }

    let mut remote = HttpRemote::new(&config.base_url, &config.api_key);
    let mut clock = SystemClock::new();
    let mut sink = LogEventSink::new();
    let mut scheduler = Scheduler::new(&config);

    let result = scheduler.run(&mut hw, &mut remote, &mut clock, &mut sink, &stop);
    hw.shutdown();
    result.context("hardware agent stopped on fault")
}

/// File (optional), then environment, then validation.
fn load_config() -> Result<AgentConfig> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from));

    let mut config = match &path {
        Some(p) => AgentConfig::load(p).with_context(|| format!("loading {}", p.display()))?,
        None => AgentConfig::default(),
    };
    config
        .apply_env(|key| std::env::var(key).ok())
        .context("reading environment overrides")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Console always, plus a non-rotating file when one is configured.
///
/// `log` records from the library are bridged into `tracing`.  Returns
/// the reason the file layer was skipped, to be logged once the
/// subscriber is up.
fn init_logging(log_file: Option<&Path>) -> Option<String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut file_error = None;
    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(appender) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(appender),
        ),
        Err(e) => {
            file_error = Some(e);
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    file_error
}

fn open_log_file(path: &Path) -> Result<RollingFileAppender, String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
        .map_err(|e| format!("{}: {e}", path.display()))
}
