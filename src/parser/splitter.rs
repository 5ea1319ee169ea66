use super::lexer::{depth_delta, is_ident_char, matching_close, CodeChars};
use super::types::{Fragment, Invocation};
use crate::error::{QtraceError, Result};

/// Split a full call expression (`q!(a, f(b, c))`) into exactly `expected`
/// top-level argument fragments.
///
/// Anything before the last top-level `;` inside the delimiters is a logger
/// handle, not an argument, and is dropped. A trailing comma is allowed.
pub fn split_arguments(raw_text: &str, expected: usize) -> Result<Vec<Fragment>> {
    let inner = call_arguments(raw_text)?;
    let inner = match top_level_positions(inner, ';').last() {
        Some(&semi) => &inner[semi + 1..],
        None => inner,
    };

    let mut pieces = Vec::new();
    let mut start = 0usize;
    for comma in top_level_positions(inner, ',') {
        pieces.push(&inner[start..comma]);
        start = comma + 1;
    }
    pieces.push(&inner[start..]);
    if pieces.last().is_some_and(|p| p.trim().is_empty()) {
        pieces.pop();
    }

    if pieces.len() != expected {
        return Err(QtraceError::SplitMismatch {
            expected,
            found: pieces.len(),
        });
    }
    Ok(pieces.into_iter().map(to_fragment).collect())
}

/// The text between the first open delimiter and its matching close.
fn call_arguments(raw_text: &str) -> Result<&str> {
    let open = CodeChars::new(raw_text)
        .find(|&(_, c)| depth_delta(c) > 0)
        .map(|(i, _)| i)
        .ok_or(QtraceError::Unbalanced)?;
    let close = matching_close(raw_text, open).ok_or(QtraceError::Unbalanced)?;
    Ok(&raw_text[open + 1..close])
}

/// Byte positions of `target` outside any delimiters or turbofish generics.
fn top_level_positions(text: &str, target: char) -> Vec<usize> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut angle = 0i32;
    let mut prev = [' ', ' '];

    for (i, ch) in CodeChars::new(text) {
        if angle > 0 {
            match ch {
                '<' => angle += 1,
                '>' if prev[1] != '-' => angle -= 1,
                _ => {}
            }
        } else if ch == '<' && prev == [':', ':'] {
            angle = 1;
        } else {
            depth += depth_delta(ch);
            if depth == 0 && ch == target {
                out.push(i);
            }
        }
        prev = [prev[1], ch];
    }
    out
}

fn to_fragment(piece: &str) -> Fragment {
    let text = piece.trim().to_string();
    let keyword = keyword_name(&text).map(str::to_string);
    Fragment { text, keyword }
}

/// `name = expr` at the top level, where `=` is a plain assignment.
fn keyword_name(text: &str) -> Option<&str> {
    let eq = top_level_positions(text, '=').into_iter().find(|&i| {
        let before = text[..i].chars().next_back();
        let after = text[i + 1..].chars().next();
        !matches!(
            before,
            Some('=' | '<' | '>' | '!' | '+' | '-' | '*' | '/' | '%' | '^' | '&' | '|')
        ) && !matches!(after, Some('=' | '>'))
    })?;
    let name = text[..eq].trim();
    let starts_ok = name.chars().next().is_some_and(|c| c == '_' || c.is_alphabetic());
    (starts_ok && name.chars().all(is_ident_char)).then_some(name)
}

/// Every invocation of one of the `names` macros in `line`, left to right.
///
/// Names inside string literals and comments are ignored. A path prefix
/// (`qtrace::q!`) is part of the invocation. `close` is left unset.
pub fn find_invocations(line: &str, names: &[&str]) -> Vec<Invocation> {
    let code: Vec<(usize, char)> = CodeChars::new(line).collect();
    let mut out = Vec::new();
    let mut k = 0usize;

    while k < code.len() {
        let (at, ch) = code[k];
        let joined_to_prev = k > 0 && {
            let (pi, pc) = code[k - 1];
            is_ident_char(pc) && pi + pc.len_utf8() == at
        };
        if !is_ident_char(ch) || joined_to_prev {
            k += 1;
            continue;
        }

        let mut end = k + 1;
        while end < code.len()
            && is_ident_char(code[end].1)
            && code[end - 1].0 + code[end - 1].1.len_utf8() == code[end].0
        {
            end += 1;
        }
        let word_end = code[end - 1].0 + code[end - 1].1.len_utf8();
        let word = &line[at..word_end];

        if names.contains(&word) {
            let mut next = code[end..].iter().filter(|(_, c)| !c.is_whitespace());
            if let (Some(&(_, '!')), Some(&(open, delim))) = (next.next(), next.next()) {
                if depth_delta(delim) > 0 {
                    let start = path_start(line, at);
                    out.push(Invocation {
                        column: line[..start].chars().count() as u32 + 1,
                        start,
                        open,
                        close: None,
                    });
                }
            }
        }
        k = end;
    }
    out
}

/// Walk back over `seg::seg::` path segments in front of a macro name.
fn path_start(line: &str, name_at: usize) -> usize {
    let mut start = name_at;
    while let Some(head) = line[..start].strip_suffix("::") {
        let seg = head
            .char_indices()
            .rev()
            .take_while(|&(_, c)| is_ident_char(c) || c == '$')
            .last()
            .map_or(head.len(), |(i, _)| i);
        start = seg;
    }
    start
}

/// How many of `invocations` finish before `target` does.
///
/// Arguments evaluate before the call that receives them and siblings
/// evaluate left to right, so completion order is closing-delimiter order.
pub fn evaluation_rank(invocations: &[Invocation], target: &Invocation) -> usize {
    let Some(target_close) = target.close else {
        return 0;
    };
    invocations
        .iter()
        .filter_map(|inv| inv.close)
        .filter(|&close| close < target_close)
        .count()
}
