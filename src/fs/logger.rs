//! Console and file logger for the robot programs.
//!
//! Implements the [`log`] facade. Every record is printed to the console,
//! which the brain forwards to a tethered terminal, and appended to
//! `log.txt` so a run can be read back from the SD card after a match.
//!
//! # Usage
//!
//! ```ignore
//! use log::LevelFilter;
//! use vexops::fs::logger;
//!
//! #[vexide::main]
//! async fn main(peripherals: Peripherals) {
//!     logger::init(LevelFilter::Info).unwrap_or_else(|e| println!("Logger Error: {}", e));
//!     log::info!("Program Started");
//! }
//! ```
//!
//! # Log Output
//!
//! One line per record: level, time since the program started, target and
//! message.
//!
//! ```text
//! INFO [1s 20ms] vexops::auton - Routine started with 4 steps
//! WARN [9s 640ms] vexops::robots - Belt Command Error: Smart port 13 error: unplugged
//! ```

use std::{
    fmt,
    fs::OpenOptions,
    io::{BufWriter, Write},
    sync::{Mutex, OnceLock},
    time::Duration,
};

use humantime::format_duration;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

/// File the log is written to, relative to the SD card root.
pub const LOG_FILE: &str = "log.txt";

type Sink = Box<dyn Write + Send>;

/// Writes records to the console and to an optional sink.
pub struct OpsLogger {
    /// `None` when the log file could not be opened, for example with no SD
    /// card inserted. Console output still works.
    sink: Mutex<Option<Sink>>,
}

impl OpsLogger {
    /// Creates a logger that truncates and writes [`LOG_FILE`].
    pub fn new() -> Self {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(LOG_FILE)
            .ok()
            .map(|file| Box::new(BufWriter::new(file)) as Sink);
        Self {
            sink: Mutex::new(file),
        }
    }

    /// Creates a logger that writes to `sink` instead of the log file.
    pub fn with_sink(sink: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Some(Box::new(sink))),
        }
    }
}

impl Default for OpsLogger {
    fn default() -> Self { Self::new() }
}

impl log::Log for OpsLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), uptime(), record.target(), record.args());
        print!("{}", line);

        if let Ok(mut sink) = self.sink.lock() {
            if let Some(writer) = sink.as_mut() {
                let _ = writer.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            if let Some(writer) = sink.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: OnceLock<OpsLogger> = OnceLock::new();

/// Installs the logger and sets the maximum level.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(OpsLogger::new);
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

/// `LEVEL [uptime] target - message`, newline terminated.
pub fn format_line(level: Level, uptime: Duration, target: &str, args: &fmt::Arguments) -> String {
    // whole milliseconds keep humantime from printing micro- and nanoseconds
    let uptime = Duration::from_millis(uptime.as_millis() as u64);
    format!("{} [{}] {} - {}\n", level, format_duration(uptime), target, args)
}

#[cfg(feature = "hardware")]
fn uptime() -> Duration { vexide::time::user_uptime() }

#[cfg(not(feature = "hardware"))]
fn uptime() -> Duration {
    static START: OnceLock<std::time::Instant> = OnceLock::new();
    START.get_or_init(std::time::Instant::now).elapsed()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use log::Log;

    use super::*;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
    }

    #[test]
    fn line_format() {
        let line = format_line(
            Level::Warn,
            Duration::from_micros(9_640_250),
            "vexops::robots",
            &format_args!("Belt Command Error: {}", "unplugged"),
        );
        assert_eq!(line, "WARN [9s 640ms] vexops::robots - Belt Command Error: unplugged\n");
    }

    #[test]
    fn records_reach_the_sink() {
        let buffer = Shared::default();
        let logger = OpsLogger::with_sink(buffer.clone());
        log::set_max_level(LevelFilter::Info);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("vexops::auton")
                .args(format_args!("Routine finished"))
                .build(),
        );
        logger.flush();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(written.starts_with("INFO ["));
        assert!(written.ends_with("] vexops::auton - Routine finished\n"));
    }
}
