use super::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Values,
    TraceEnter,
    TraceExit,
}

/// One append-only log record: a location prefix and a styled body.
#[derive(Debug, Clone)]
pub struct LogEntry {
    prefix: String,
    kind: EntryKind,
    segments: Vec<(Style, String)>,
}

impl LogEntry {
    pub fn new(prefix: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, style: Style, text: impl Into<String>) -> &mut Self {
        self.segments.push((style, text.into()));
        self
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_trace_entry(&self) -> bool {
        self.kind == EntryKind::TraceEnter
    }

    pub fn is_trace_exit(&self) -> bool {
        self.kind == EntryKind::TraceExit
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Body without styling.
    pub fn body(&self) -> String {
        self.segments.iter().map(|(_, text)| text.as_str()).collect()
    }

    /// Full line(s) including the trailing newline.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::with_capacity(self.prefix.len() + 64);
        Style::Location.paint(&self.prefix, color, &mut out);
        out.push(' ');
        for (style, text) in &self.segments {
            style.paint(text, color, &mut out);
        }
        out.push('\n');
        out
    }
}
