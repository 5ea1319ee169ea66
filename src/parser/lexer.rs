/// Iterator over the characters of Rust source text that are code.
///
/// String, byte-string, raw-string and char literals are skipped whole, as
/// are `//` and (nested) `/* */` comments. Lifetimes and loop labels are
/// code. Yields `(byte_index, char)`.
pub struct CodeChars<'a> {
    text: &'a str,
    pos: usize,
    prev_ident: bool,
}

impl<'a> CodeChars<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::starting_at(text, 0)
    }

    pub fn starting_at(text: &'a str, pos: usize) -> Self {
        Self {
            text,
            pos,
            prev_ident: false,
        }
    }

    fn literal_len(&self, rest: &str) -> Option<usize> {
        if rest.starts_with('"') {
            return Some(string_len(rest));
        }
        if rest.starts_with('\'') {
            return char_len(rest);
        }
        if self.prev_ident {
            return None;
        }

        // b"..", c"..", b'..', r"..", r#".."#, br#".."#, cr".."
        let mut prefix = 0usize;
        if rest.starts_with('b') || rest.starts_with('c') {
            prefix = 1;
        }
        let after = &rest[prefix..];
        if prefix == 1 && after.starts_with('"') {
            return Some(prefix + string_len(after));
        }
        if rest.starts_with("b'") {
            return char_len(after).map(|len| prefix + len);
        }
        if after.starts_with('r') {
            return raw_string_len(&after[1..]).map(|len| prefix + 1 + len);
        }
        None
    }
}

impl Iterator for CodeChars<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<(usize, char)> {
        loop {
            let rest = &self.text[self.pos..];
            let ch = rest.chars().next()?;

            if let Some(len) = self.literal_len(rest) {
                self.pos += len;
                self.prev_ident = false;
                continue;
            }
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
                continue;
            }
            if rest.starts_with("/*") {
                self.pos += block_comment_len(rest);
                self.prev_ident = false;
                continue;
            }

            let at = self.pos;
            self.pos += ch.len_utf8();
            self.prev_ident = is_ident_char(ch);
            return Some((at, ch));
        }
    }
}

pub fn is_ident_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// Net effect of a code character on `()[]{}` nesting.
pub fn depth_delta(ch: char) -> i32 {
    match ch {
        '(' | '[' | '{' => 1,
        ')' | ']' | '}' => -1,
        _ => 0,
    }
}

/// Byte index of the delimiter closing the one opened at `open_at`.
pub fn matching_close(text: &str, open_at: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, ch) in CodeChars::starting_at(text, open_at) {
        depth += depth_delta(ch);
        if depth == 0 {
            return Some(i);
        }
    }
    None
}

/// Length of a `"..."` literal, escape-aware. Unterminated runs to the end.
fn string_len(s: &str) -> usize {
    let mut escaped = false;
    for (i, ch) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => return i + 1,
            _ => {}
        }
    }
    s.len()
}

/// `s` starts right after the `r`: zero or more `#`, then a quote.
fn raw_string_len(s: &str) -> Option<usize> {
    let hashes = s.chars().take_while(|&c| c == '#').count();
    if !s[hashes..].starts_with('"') {
        return None;
    }
    let body_start = hashes + 1;
    let closing = format!("\"{}", "#".repeat(hashes));
    match s[body_start..].find(&closing) {
        Some(end) => Some(body_start + end + closing.len()),
        None => Some(s.len()),
    }
}

/// Char literal length, or `None` when the quote starts a lifetime/label.
fn char_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().skip(1);
    let (_, first) = chars.next()?;
    if first == '\\' {
        // skip the escaped char, then find the closing quote
        chars.next()?;
        return chars.find(|&(_, c)| c == '\'').map(|(i, _)| i + 1);
    }
    match chars.next() {
        Some((i, '\'')) => Some(i + 1),
        _ => None,
    }
}

fn block_comment_len(s: &str) -> usize {
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < s.len() {
        let rest = &s[i..];
        if rest.starts_with("/*") {
            depth += 1;
            i += 2;
        } else if rest.starts_with("*/") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    s.len()
}
