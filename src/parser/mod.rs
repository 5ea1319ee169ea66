mod callsite;
mod lexer;
mod splitter;
mod types;

pub use callsite::{call_site_in, locate_source, resolve, try_resolve, ENTRY_POINTS};
pub use lexer::{matching_close, CodeChars};
pub use splitter::{evaluation_rank, find_invocations, split_arguments};
pub use types::{ArgumentExpression, CallSite, Fragment, Invocation};
