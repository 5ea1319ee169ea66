use super::lexer::matching_close;
use super::splitter::{evaluation_rank, find_invocations};
use super::types::{CallSite, Invocation};
use crate::error::{QtraceError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Macro names whose invocations the resolver looks for.
pub const ENTRY_POINTS: &[&str] = &["q", "q_with"];

/// Find the file `file!()` refers to.
///
/// `file!()` is relative to the directory cargo was invoked for, which is the
/// package root or, for workspace members, one of its ancestors.
pub fn locate_source(file: &str, manifest_dir: Option<&str>) -> Option<PathBuf> {
    let direct = Path::new(file);
    if direct.is_file() {
        return Some(direct.to_path_buf());
    }
    let base = Path::new(manifest_dir?);
    base.ancestors()
        .map(|dir| dir.join(file))
        .find(|candidate| candidate.is_file())
}

/// Resolve a call site, degrading to a location-only site on any failure.
pub fn resolve(file: &str, line: u32, column: u32, manifest_dir: Option<&str>) -> CallSite {
    match try_resolve(file, line, column, manifest_dir) {
        Ok(site) => site,
        Err(e) => {
            log::debug!("no call text for {}:{}:{}: {}", file, line, column, e);
            CallSite::at(file, line)
        }
    }
}

pub fn try_resolve(
    file: &str,
    line: u32,
    column: u32,
    manifest_dir: Option<&str>,
) -> Result<CallSite> {
    let path = locate_source(file, manifest_dir).ok_or_else(|| unavailable(file, line))?;
    let contents = fs::read_to_string(&path).map_err(|source| QtraceError::Io { path, source })?;
    call_site_in(&contents, file, line, column)
}

/// Build the call site for the invocation starting at `line`/`column` of
/// `contents`, following it onto later lines until its delimiter closes.
pub fn call_site_in(contents: &str, file: &str, line: u32, column: u32) -> Result<CallSite> {
    let offset = line_offset(contents, line).ok_or_else(|| unavailable(file, line))?;
    let rest = &contents[offset..];
    let first_line = rest.split('\n').next().unwrap_or_default();

    let mut invocations = find_invocations(first_line, ENTRY_POINTS);
    for inv in &mut invocations {
        inv.close = matching_close(rest, inv.open);
    }
    let target = pick(&invocations, column).ok_or_else(|| unavailable(file, line))?;
    let close = target.close.ok_or(QtraceError::Unbalanced)?;

    Ok(CallSite {
        file_path: file.to_string(),
        first_line_number: line,
        raw_text: rest[target.start..=close].to_string(),
        invocation_index: evaluation_rank(&invocations, target),
    })
}

/// The invocation starting exactly at the compiler-reported column.
///
/// No match means the call came out of another macro's expansion, and a
/// neighbouring call's text would mislabel the values.
fn pick(invocations: &[Invocation], column: u32) -> Option<&Invocation> {
    invocations.iter().find(|inv| inv.column == column)
}

/// Byte offset where 1-based `line` starts.
fn line_offset(contents: &str, line: u32) -> Option<usize> {
    if line == 0 {
        return None;
    }
    if line == 1 {
        return Some(0);
    }
    contents
        .match_indices('\n')
        .nth(line as usize - 2)
        .map(|(i, _)| i + 1)
        .filter(|&start| start < contents.len())
}

fn unavailable(file: &str, line: u32) -> QtraceError {
    QtraceError::SourceUnavailable {
        file: file.to_string(),
        line,
    }
}
