//! Tracing setup for the `capbridge` binary.
//!
//! Always logs to stderr (stdout carries frames in `--stdio` mode). Outside
//! dev mode, with file logging on, lines are also appended to a daily
//! `YYYY-MM-DD.log` in the log directory.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use capbridge_config::CapbridgeConfig;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `directive` comes from `--log-level`;
/// without it the configured level applies to every `capbridge` crate.
pub fn init(directive: Option<&str>, config: &CapbridgeConfig, log_dir: Option<PathBuf>) {
    let directive = directive
        .map(String::from)
        .unwrap_or_else(|| default_directive(config));
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| LevelFilter::INFO.into()),
    );

    let file_layer = log_dir
        .filter(|_| wants_file_log(config))
        .map(|dir| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(DailyLogFile::new(dir))
        });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();
}

/// `capbridge=<level>` from `[logging] level`.
pub fn default_directive(config: &CapbridgeConfig) -> String {
    format!("capbridge={}", config.logging.level.as_str())
}

pub fn wants_file_log(config: &CapbridgeConfig) -> bool {
    !config.dev.enabled && config.logging.file_logging
}

/// Log panics through tracing, then run the default hook.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "uncaught panic");
        default_hook(info);
    }));
}

// =============================================================================
// DAILY FILE
// =============================================================================

/// Appends to `<dir>/<local date>.log`, switching files when the date
/// changes. Write failures are swallowed.
pub struct DailyLogFile {
    dir: PathBuf,
    current: Mutex<Option<(String, File)>>,
}

impl DailyLogFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            current: Mutex::new(None),
        }
    }

    pub fn path_for(&self, date: &str) -> PathBuf {
        self.dir.join(format!("{date}.log"))
    }

    fn write_dated(&self, date: &str, buf: &[u8]) -> io::Result<()> {
        let mut current = self.lock();
        let stale = current.as_ref().map_or(true, |(d, _)| d != date);
        if stale {
            *current = Some((date.to_string(), open_append(&self.path_for(date))?));
        }
        if let Some((_, file)) = current.as_mut() {
            file.write_all(buf)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Option<(String, File)>> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub struct DailyLogWriter<'a> {
    file: &'a DailyLogFile,
}

impl Write for DailyLogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        // A broken log file must never take the host down.
        let _ = self.file.write_dated(&date, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some((_, file)) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DailyLogFile {
    type Writer = DailyLogWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        DailyLogWriter { file: self }
    }
}
