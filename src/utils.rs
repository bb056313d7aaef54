use anyhow::Result;
use std::io::Write;
use log::{LevelFilter, Record};
use std::fs::OpenOptions;
use chrono::{DateTime, Local};

// File logger: the terminal belongs to the UI, so log lines go to a file.

pub struct SimpleLogger {
    log_file: Option<std::fs::File>,
}

impl SimpleLogger {
    pub fn new(log_file_path: Option<&str>) -> Result<Self> {
        let log_file = match log_file_path {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };

        Ok(SimpleLogger { log_file })
    }
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let now: DateTime<Local> = Local::now();
        let log_message = format!(
            "[{}] {} [{}:{}] {}\n",
            now.format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.file().unwrap_or("unknown"),
            record.line().unwrap_or(0),
            record.args()
        );

        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.try_clone() {
                let _ = file.write_all(log_message.as_bytes());
            }
        } else {
            // Only reached when no log file was given, e.g. before the UI starts
            eprint!("{}", log_message);
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.log_file {
            if let Ok(mut file) = file.try_clone() {
                let _ = file.flush();
            }
        }
    }
}

pub fn setup_logging(log_file: Option<&str>, level: LevelFilter) -> Result<()> {
    let logger = SimpleLogger::new(log_file)?;
    log::set_boxed_logger(Box::new(logger))
        .map(|()| log::set_max_level(level))?;

    log::info!("Logging initialized at level: {}", level);
    log::info!("App version: {} ({})", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_NAME"));

    Ok(())
}
