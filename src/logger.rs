use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;

/// Overrides the default filter, `EnvFilter` syntax
pub const ENV_LOG: &str = "STOCKSCREEN_LOG";
const DEFAULT_FILTER: &str = "error,stockscreen=debug";

static ACTIVE_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn default_log_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let path = dirs::home_dir().map(|p| p.join("Library/Logs/StockScreen"));
    #[cfg(target_os = "windows")]
    let path = dirs::data_local_dir().map(|p| p.join("StockScreen\\Logs"));
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let path = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
        .map(|p| p.join("stockscreen/logs"));

    path.unwrap_or_else(fallback_log_dir)
}

fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join("stockscreen").join("logs")
}

#[must_use]
pub fn active_log_dir() -> PathBuf {
    ACTIVE_LOG_DIR
        .get()
        .cloned()
        .unwrap_or_else(default_log_dir)
}

fn local_offset() -> time::UtcOffset {
    time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC)
}

/// Log to a daily rolling file. Keep the guard alive until exit or buffered
/// lines are lost.
pub fn init() -> anyhow::Result<WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let primary_log_dir = default_log_dir();
    let log_dir = if std::fs::create_dir_all(&primary_log_dir).is_ok() {
        primary_log_dir
    } else {
        let fallback = fallback_log_dir();
        let _ = std::fs::create_dir_all(&fallback);
        fallback
    };

    let _ = ACTIVE_LOG_DIR.set(log_dir.clone());

    let writer = RollingFileAppender::builder()
        .filename_prefix("stockscreen")
        .filename_suffix("log")
        .max_log_files(5)
        .rotation(Rotation::DAILY)
        .build(&log_dir)
        .with_context(|| format!("日志初始化失败（目录: {}）", log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(writer);

    let timer = fmt::time::OffsetTime::new(
        local_offset(),
        time::format_description::well_known::Rfc3339,
    );
    let file_line = cfg!(debug_assertions);

    let subscriber = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_thread_ids(true)
        .with_file(file_line)
        .with_line_number(file_line)
        .with_writer(writer);

    let dirs = std::env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let subscriber = subscriber.with_filter(tracing_subscriber::EnvFilter::new(dirs));

    tracing_subscriber::registry()
        .with(subscriber)
        .try_init()
        .context("日志订阅器已初始化")?;
    Ok(guard)
}
