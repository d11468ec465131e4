// ============================================================================
// Logging
// ============================================================================
// Structured logging for the scheduling engine, built on `tracing`. Console
// output is human-readable; file output is daily-rotated JSON so the
// calendar/preprocessor/solver/decoder trail of a single request can be
// reconstructed after the fact.
// ============================================================================

use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub file_output: bool,
    pub file_prefix: String,
    pub with_target: bool,
    pub with_location: bool,
    pub with_thread_info: bool,
    /// Days of rotated log files to keep; 0 disables cleanup.
    pub retention_days: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: if cfg!(debug_assertions) {
                Level::DEBUG
            } else {
                Level::INFO
            },
            log_dir: PathBuf::from("logs"),
            console_output: true,
            file_output: true,
            file_prefix: "timetable-engine".to_string(),
            with_target: true,
            with_location: true,
            with_thread_info: false,
            retention_days: 30,
        }
    }
}

impl LogConfig {
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            console_output: true,
            file_output: true,
            with_thread_info: true,
            retention_days: 7,
            ..Default::default()
        }
    }

    pub fn production() -> Self {
        Self {
            level: Level::INFO,
            console_output: false,
            file_output: true,
            with_thread_info: false,
            retention_days: 30,
            ..Default::default()
        }
    }

    /// No file output, console only — used by integration tests.
    pub fn test() -> Self {
        Self {
            level: Level::DEBUG,
            console_output: true,
            file_output: false,
            retention_days: 0,
            ..Default::default()
        }
    }
}

/// Initializes the global `tracing` subscriber from `config`.
///
/// Respects `RUST_LOG` if set, otherwise filters by `config.level` scoped to
/// this crate's target.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.file_output {
        std::fs::create_dir_all(&config.log_dir)?;
        if config.retention_days > 0 {
            cleanup_old_logs(&config.log_dir, &config.file_prefix, config.retention_days)?;
        }
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            config.level
        ))
    });

    match (config.console_output, config.file_output) {
        (true, true) => {
            let console_layer = fmt::layer()
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_thread_ids(config.with_thread_info)
                .with_thread_names(config.with_thread_info)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(true)
                .pretty();

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .build(&config.log_dir)?;

            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_thread_ids(config.with_thread_info)
                .with_thread_names(config.with_thread_info)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
        }
        (true, false) => {
            let console_layer = fmt::layer()
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_thread_ids(config.with_thread_info)
                .with_thread_names(config.with_thread_info)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
        }
        (false, true) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(&config.file_prefix)
                .filename_suffix("log")
                .build(&config.log_dir)?;

            let file_layer = fmt::layer()
                .with_writer(file_appender)
                .with_target(config.with_target)
                .with_file(config.with_location)
                .with_line_number(config.with_location)
                .with_thread_ids(config.with_thread_info)
                .with_thread_names(config.with_thread_info)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .init();
        }
        (false, false) => {
            tracing_subscriber::registry().with(env_filter).init();
        }
    }

    Ok(())
}

/// Initializes logging with `development()` or `production()` depending on
/// the build profile. Failures are reported to stderr and otherwise ignored
/// — a missing log directory must never stop the scheduler from running.
pub fn init_default_logging() {
    let config = if cfg!(debug_assertions) {
        LogConfig::development()
    } else {
        LogConfig::production()
    };

    if let Err(e) = init_logging(config) {
        eprintln!("failed to initialize logging: {}", e);
    }
}

fn cleanup_old_logs(
    log_dir: &PathBuf,
    file_prefix: &str,
    retention_days: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let cutoff_time = now.saturating_sub(retention_days as u64 * 24 * 60 * 60);

    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !file_name.starts_with(file_prefix) || !file_name.ends_with(".log") {
            continue;
        }
        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                let modified_secs = modified
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                if modified_secs < cutoff_time {
                    let _ = std::fs::remove_file(&path);
                }
            }
        }
    }

    Ok(())
}
