use colored::*;
use std::{
  fmt,
  fs::{self},
  io::{self, Write},
};

#[derive(Debug)]
pub enum LogType<'a> {
  Error(&'a str),
  Warn(&'a str),
  Info(&'a str),
  Debug(&'a str),
}

impl<'a> fmt::Display for LogType<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LogType::Error(error) => write!(f, "{} {}", "[Error]".red().bold(), error.red().bold()),
      LogType::Warn(warn) => write!(f, "{} {}", "[Warn]".yellow().bold(), warn.yellow().bold()),
      LogType::Info(info) => write!(f, "{} {}", "[Info]".cyan().bold(), info.cyan().bold()),
      LogType::Debug(plain) => write!(f, "{} {}", "[Debug]", plain),
    }
  }
}

pub struct Logger;

impl Logger {
  /// Logs to stderr, timestamped, so stdout stays reserved for `ir`/`asm`
  /// program output. `option == 1` also appends to `./tmp/log.txt` for a
  /// durable record across runs; `option == 2` does both.
  pub fn log(log: LogType, option: u8) -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let log_str = format!("[{}] {}", now, log);
    match option {
      1 => {
        Logger::log_to_file(&log_str);
      },
      2 => {
        Logger::log_to_file(&log_str);
        eprintln!("{}", log_str);
      },
      _ => {
        eprintln!("{}", log_str);
      },
    };
    log_str
  }

  /// Convenience for `core::runner`'s one-line-per-stage instrumentation.
  pub fn stage(name: &str) -> String {
    Logger::log(LogType::Info(&format!("entering stage: {}", name)), 0)
  }

  fn log_to_file(log_str: &String) {
    let file_handler = fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open("./tmp/log.txt");

    match file_handler {
      Ok(file) => {
        let mut writer = io::BufWriter::new(file);
        if let Err(e) = writer.write_all(log_str.as_bytes()) {
          eprintln!("Failed to write to log file: {}", e);
        }
        if let Err(e) = writer.write_all(b"\n") {
          eprintln!("Failed to write to log file: {}", e);
        }
      },
      Err(e) => {
        eprintln!("Failed to open or create log file: {}", e);
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn log_returns_timestamped_line() {
    let line = Logger::log(LogType::Info("entering stage: lexer"), 0);
    assert!(line.contains("entering stage: lexer"));
    assert!(line.starts_with('['));
  }

  #[test]
  fn stage_wraps_name_as_info() {
    let line = Logger::stage("parser");
    assert!(line.contains("entering stage: parser"));
  }
}
