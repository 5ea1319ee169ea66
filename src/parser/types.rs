/// Where a logging call happened and the exact text of the call.
///
/// `raw_text` spans from the entry-point name through the matching close
/// delimiter, possibly over several physical lines. It is empty when the
/// source could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file_path: String,
    pub first_line_number: u32,
    pub raw_text: String,
    /// How many entry-point calls on the same line complete before this one.
    /// Informational: the call itself is picked by exact column.
    pub invocation_index: usize,
}

impl CallSite {
    /// A call site known only by location.
    pub fn at(file_path: impl Into<String>, line: u32) -> Self {
        Self {
            file_path: file_path.into(),
            first_line_number: line,
            raw_text: String::new(),
            invocation_index: 0,
        }
    }

    pub fn has_source(&self) -> bool {
        !self.raw_text.is_empty()
    }
}

/// One entry-point invocation found on a physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// 1-based char column where the (possibly path-qualified) macro name starts.
    pub column: u32,
    /// Byte offset of the name, relative to the scanned text.
    pub start: usize,
    pub open: usize,
    /// `None` until the closing delimiter has been found.
    pub close: Option<usize>,
}

/// One top-level argument of a call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    /// Set for `name = expr` fragments.
    pub keyword: Option<String>,
}

impl Fragment {
    pub fn label(&self) -> &str {
        self.keyword.as_deref().unwrap_or(&self.text)
    }
}

/// A source label paired with the value it produced.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentExpression<'a> {
    pub text: &'a str,
    pub value: &'a dyn std::fmt::Debug,
}
