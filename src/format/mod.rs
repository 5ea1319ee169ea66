//! Rendering of `expr=value` pairs, trace calls and return values into
//! styled log entries.

use crate::parser::ArgumentExpression;
use crate::writer::{EntryKind, LogEntry, Style};
use std::fmt::Debug;
use std::time::Duration;

/// One argument of a traced call. `name` is the parameter name or the
/// keyword given at call time; unnamed arguments render as bare values.
#[derive(Clone, Copy)]
pub struct CallArg<'a> {
    pub name: Option<&'a str>,
    pub value: &'a dyn Debug,
}

const CALL_INDENT: &str = "    ";

/// `Debug` form, switching to `{:#?}` when the flat form is too wide.
pub fn render_value(value: &dyn Debug, wrap_width: usize) -> String {
    let flat = format!("{:?}", value);
    if flat.len() <= wrap_width {
        return flat;
    }
    let pretty = format!("{:#?}", value);
    if pretty.contains('\n') {
        pretty
    } else {
        flat
    }
}

/// Collapse the whitespace of a (possibly multi-line) source fragment.
pub fn normalize_label(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn location_prefix(elapsed: Duration, file: &str, line: u32, function: Option<&str>) -> String {
    let secs = elapsed.as_secs_f64();
    match function {
        Some(function) => format!("{secs:6.3}s {file}:{line} {function}:"),
        None => format!("{secs:6.3}s {file}:{line}"),
    }
}

/// Last two path segments of a function path, closures removed.
///
/// `<crate::A as Trait>::fmt` becomes `A::fmt` and `Wrapper<T>::get` becomes
/// `Wrapper::get`.
pub fn short_function(path: &str) -> String {
    let mut path = path;
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    let segments: Vec<&str> = path_segments(path).into_iter().map(owner_name).collect();
    let keep = segments.len().saturating_sub(2);
    segments[keep..].join("::")
}

/// Split on `::` outside generic brackets.
fn path_segments(path: &str) -> Vec<&str> {
    let bytes = path.as_bytes();
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                out.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    out.push(&path[start..]);
    out
}

fn owner_name(segment: &str) -> &str {
    let segment = match segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some(qualified) => {
            let self_ty = qualified.split(" as ").next().unwrap_or(qualified);
            path_segments(self_ty).pop().unwrap_or(self_ty)
        }
        None => segment,
    };
    match segment.find('<') {
        Some(i) => &segment[..i],
        None => segment,
    }
}

/// `label=value, label=value`; a label that already reads as its value
/// (a literal) prints once.
pub fn value_entry(prefix: String, pairs: &[ArgumentExpression<'_>], wrap_width: usize) -> LogEntry {
    let mut entry = LogEntry::new(prefix, EntryKind::Values);
    for (i, pair) in pairs.iter().enumerate() {
        if i > 0 {
            entry.push(Style::Plain, ", ");
        }
        let rendered = render_value(pair.value, wrap_width);
        if pair.text != rendered {
            entry.push(Style::Label, pair.text).push(Style::Plain, "=");
        }
        entry.push(Style::Value, rendered);
    }
    entry
}

/// `name(a=1, b=2)`, one argument per line when it gets too wide.
pub fn call_entry(prefix: String, name: &str, args: &[CallArg<'_>], wrap_width: usize) -> LogEntry {
    let rendered: Vec<(Option<&str>, String)> = args
        .iter()
        .map(|arg| (arg.name, render_value(arg.value, wrap_width)))
        .collect();
    let width: usize = name.len()
        + rendered
            .iter()
            .map(|(n, v)| n.map_or(0, |n| n.len() + 1) + v.len() + 2)
            .sum::<usize>();
    let wrap = width > wrap_width || rendered.iter().any(|(_, v)| v.contains('\n'));

    let mut entry = LogEntry::new(prefix, EntryKind::TraceEnter);
    entry.push(Style::Name, name).push(Style::Plain, "(");
    for (i, (arg_name, value)) in rendered.into_iter().enumerate() {
        if i > 0 {
            entry.push(Style::Plain, ",");
            if !wrap {
                entry.push(Style::Plain, " ");
            }
        }
        if wrap {
            entry.push(Style::Plain, format!("\n{CALL_INDENT}"));
        }
        if let Some(arg_name) = arg_name {
            entry.push(Style::Label, arg_name).push(Style::Plain, "=");
        }
        entry.push(Style::Value, value);
    }
    entry.push(Style::Plain, ")");
    entry
}

pub fn return_entry(prefix: String, value: &dyn Debug, wrap_width: usize) -> LogEntry {
    let mut entry = LogEntry::new(prefix, EntryKind::TraceExit);
    entry
        .push(Style::Plain, "-> ")
        .push(Style::Return, render_value(value, wrap_width));
    entry
}
