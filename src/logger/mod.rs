//! The inline logger behind `q!` and the process-wide logger handle.

use crate::args::TraceArg;
use crate::config::Config;
use crate::error::{QtraceError, Result};
use crate::format::{self, CallArg};
use crate::parser::{self, ArgumentExpression, CallSite};
use crate::trace::Signature;
use crate::writer::Writer;
use std::fmt::Debug;
use std::panic::Location;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Compile-time facts about a `q!` invocation, filled in by the macro.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    /// Full path of the enclosing function.
    pub function: &'static str,
    pub manifest_dir: Option<&'static str>,
    /// Token text of each argument.
    pub exprs: &'static [&'static str],
}

pub struct Logger {
    writer: Writer,
    started: Instant,
    wrap_width: usize,
}

impl Logger {
    pub fn new(config: Config) -> Self {
        let writer = Writer::from_config(&config);
        if config.truncate_on_start {
            if let Err(e) = writer.truncate() {
                log::warn!("could not truncate log: {}", e);
            }
        }
        Self {
            writer,
            started: Instant::now(),
            wrap_width: config.wrap_width,
        }
    }

    pub fn writer(&self) -> &Writer {
        &self.writer
    }

    /// Write one entry pairing each value with the source text that
    /// produced it.
    pub fn log_values(&self, caller: &Caller, values: &[&dyn Debug]) {
        let site = parser::resolve(caller.file, caller.line, caller.column, caller.manifest_dir);
        let labels = labels_for(caller, &site, values.len());
        let pairs: Vec<ArgumentExpression<'_>> = labels
            .iter()
            .zip(values)
            .map(|(text, &value)| ArgumentExpression { text, value })
            .collect();

        let prefix = format::location_prefix(
            self.started.elapsed(),
            caller.file,
            caller.line,
            Some(&format::short_function(caller.function)),
        );
        self.writer
            .write_entry(&format::value_entry(prefix, &pairs, self.wrap_width));
    }

    /// `Qualified::name(param=value, ...)` for a traced call.
    ///
    /// Positional values take the parameter names declared by `original`;
    /// keyword arguments keep their call-time key.
    pub fn trace_enter(
        &self,
        at: &'static Location<'static>,
        original: &Signature,
        args: &[&dyn TraceArg],
    ) {
        let site = CallSite::at(at.file(), at.line());
        let params = original.params();
        let mut positional = 0usize;
        let call_args: Vec<CallArg<'_>> = args
            .iter()
            .map(|arg| match arg.keyword() {
                Some(key) => CallArg {
                    name: Some(key),
                    value: arg.value(),
                },
                None => {
                    let name = params.get(positional).map(String::as_str);
                    positional += 1;
                    CallArg {
                        name,
                        value: arg.value(),
                    }
                }
            })
            .collect();

        let prefix = self.trace_prefix(&site);
        self.writer.write_entry(&format::call_entry(
            prefix,
            &original.qualified_name(),
            &call_args,
            self.wrap_width,
        ));
    }

    pub fn trace_exit(&self, at: &'static Location<'static>, value: &dyn Debug) {
        let site = CallSite::at(at.file(), at.line());
        let prefix = self.trace_prefix(&site);
        self.writer
            .write_entry(&format::return_entry(prefix, value, self.wrap_width));
    }

    fn trace_prefix(&self, site: &CallSite) -> String {
        format::location_prefix(
            self.started.elapsed(),
            &site.file_path,
            site.first_line_number,
            None,
        )
    }
}

/// Source split first, then the macro's token text, then `argN`.
fn labels_for(caller: &Caller, site: &CallSite, n: usize) -> Vec<String> {
    if site.has_source() {
        match parser::split_arguments(&site.raw_text, n) {
            Ok(fragments) => {
                return fragments
                    .iter()
                    .map(|f| format::normalize_label(f.label()))
                    .collect()
            }
            Err(e) => log::debug!("{}:{}: {}", caller.file, caller.line, e),
        }
    }
    if caller.exprs.len() == n {
        return caller
            .exprs
            .iter()
            .map(|e| format::normalize_label(e))
            .collect();
    }
    (0..n).map(|i| format!("arg{i}")).collect()
}

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// Install the process-wide logger. Fails if it already exists.
pub fn init(config: Config) -> Result<()> {
    GLOBAL
        .set(Arc::new(Logger::new(config)))
        .map_err(|_| QtraceError::AlreadyInitialized)
}

/// The process-wide logger, created from the environment on first use.
pub fn global() -> &'static Arc<Logger> {
    GLOBAL.get_or_init(|| Arc::new(Logger::new(Config::from_env())))
}

/// The process-wide writer, e.g. to switch colors off.
pub fn writer() -> &'static Writer {
    global().writer()
}
