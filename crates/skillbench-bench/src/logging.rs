use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{Level, debug, info};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
    /// False when another global subscriber was already in place.
    pub subscriber_installed: bool,
}

/// Installs the JSON telemetry subscriber when structured logging is enabled.
///
/// `RUST_LOG` takes precedence over `logging.tracing_level`.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    fs::create_dir_all(&outputs.telemetry_dir).with_context(|| {
        format!(
            "creating telemetry directory at {}",
            outputs.telemetry_dir.display()
        )
    })?;

    let telemetry_path = outputs.telemetry_path();
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // The first subscriber in a process wins; later runs keep writing to it.
    let subscriber_installed = match tracing::subscriber::set_global_default(subscriber) {
        Ok(()) => true,
        Err(err) => {
            debug!(
                target: "skillbench_bench::logging",
                run_id,
                path = %telemetry_path.display(),
                error = %err,
                "global subscriber already installed"
            );
            false
        }
    };

    info!(
        target: "skillbench_bench::logging",
        run_id,
        level = %level,
        "telemetry enabled"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
        subscriber_installed,
    }))
}
