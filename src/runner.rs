//! The `qtrace run` wrapper: run another program with its log pointed at
//! ours and show what it appended.

use crate::config::{Config, ENV_COLOR, ENV_OUTPUT};
use crate::error::{QtraceError, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct RunOutcome {
    pub exit_code: i32,
    /// Log text the child appended while it ran.
    pub appended: String,
}

/// Split a command line the way a POSIX shell would.
pub fn split_command(line: &str) -> Result<Vec<String>> {
    match shlex::split(line) {
        Some(words) if !words.is_empty() => Ok(words),
        _ => Err(QtraceError::InvalidCommand(line.to_string())),
    }
}

pub fn run_traced(words: &[String], config: &Config) -> Result<RunOutcome> {
    let (program, rest) = words
        .split_first()
        .ok_or_else(|| QtraceError::InvalidCommand(String::new()))?;
    let path = &config.output_path;
    let start = fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    log::debug!("running {:?} with {}={}", words, ENV_OUTPUT, path.display());
    let status = Command::new(program)
        .args(rest)
        .env(ENV_OUTPUT, path)
        .env(ENV_COLOR, if config.color { "1" } else { "0" })
        .status()
        .map_err(|source| QtraceError::Io {
            path: program.into(),
            source,
        })?;

    Ok(RunOutcome {
        exit_code: status.code().unwrap_or(1),
        appended: read_from(path, start)?,
    })
}

/// The last `n` lines of the log; nothing if it does not exist yet.
pub fn tail(path: &Path, n: usize) -> Result<Vec<String>> {
    let text = read_from(path, 0)?;
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(n);
    Ok(lines[skip..].iter().map(|l| l.to_string()).collect())
}

fn read_from(path: &Path, offset: u64) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => {
            // truncated since we looked: show everything
            let from = if offset as usize > bytes.len() { 0 } else { offset as usize };
            Ok(String::from_utf8_lossy(&bytes[from..]).into_owned())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(QtraceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
