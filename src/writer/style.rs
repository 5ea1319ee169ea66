//! ANSI styling for log segments.

pub const RESET: &str = "\x1b[0m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const GREEN: &str = "\x1b[32m";
pub const MAGENTA: &str = "\x1b[35m";
pub const GRAY: &str = "\x1b[90m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Location,
    Label,
    Value,
    Name,
    Return,
}

impl Style {
    pub fn ansi(self) -> Option<&'static str> {
        match self {
            Style::Plain => None,
            Style::Location => Some(GRAY),
            Style::Label => Some(CYAN),
            Style::Value => Some(YELLOW),
            Style::Name => Some(GREEN),
            Style::Return => Some(MAGENTA),
        }
    }

    pub fn paint(self, text: &str, color: bool, out: &mut String) {
        match self.ansi() {
            Some(code) if color && !text.is_empty() => {
                out.push_str(code);
                out.push_str(text);
                out.push_str(RESET);
            }
            _ => out.push_str(text),
        }
    }
}
