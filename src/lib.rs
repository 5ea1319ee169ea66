//! Print-style debugging that remembers where each value came from.
//!
//! `q!(a, b.c)` appends `a=<value>, b.c=<value>` to a log file, labelled with
//! the exact source text of each argument, and returns the value(s) so it can
//! sit inside any expression. [`trace`] wraps a [`Callable`] and logs every
//! call and return under the name of the original callable, looking through
//! wrappers that declare what they stand in for.

#[macro_use]
mod macros;

pub mod args;
pub mod config;
pub mod error;
pub mod format;
pub mod logger;
pub mod parser;
pub mod runner;
pub mod trace;
pub mod writer;

pub use args::{ArgValues, Kw, TraceArg, TraceArgs};
pub use config::Config;
pub use error::{QtraceError, Result};
pub use logger::{global, init, writer, Caller, Logger};
pub use trace::{
    trace, trace_explicit, trace_with, Binding, Body, Callable, MethodBody, Signature, Traced,
    WrapperChain,
};
pub use writer::Writer;
