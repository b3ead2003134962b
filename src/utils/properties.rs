//! Minimal reader/writer for `key=value` properties files.
//!
//! Supports `#` and `!` comment lines, `=` or `:` separators, and the
//! backslash escapes `\\`, `\n`, `\r`, `\t` and `\f`. Line continuations and
//! `\uXXXX` escapes are not interpreted; files are read and written as UTF-8.

use std::collections::BTreeMap;

/// Parse properties text. Later duplicates of a key win.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (key, value) = split_entry(line);
        entries.insert(unescape(trim_key_end(key)), unescape(value.trim_start()));
    }

    entries
}

/// Render entries with a leading comment line and a timestamp line.
///
/// Every value is written on a single line, so `parse(render(..))` returns
/// the same entries whatever characters they contain.
pub fn render(comment: &str, entries: &BTreeMap<String, String>) -> String {
    let mut out = format!(
        "# {}\n# {}\n",
        comment.replace(|c: char| c == '\n' || c == '\r', " "),
        chrono::Utc::now().to_rfc2822()
    );
    for (key, value) in entries {
        escape_into(&mut out, key, true);
        out.push('=');
        escape_into(&mut out, value, false);
        out.push('\n');
    }
    out
}

/// Split at the first unescaped separator.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' => return (&line[..idx], &line[idx + 1..]),
            _ => {}
        }
    }
    (line, "")
}

/// Trim trailing whitespace unless the last blank is escaped.
fn trim_key_end(key: &str) -> &str {
    let trimmed = key.trim_end();
    let backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
    match key[trimmed.len()..].chars().next() {
        Some(blank) if backslashes % 2 == 1 => &key[..trimmed.len() + blank.len_utf8()],
        _ => trimmed,
    }
}

fn escape_into(out: &mut String, raw: &str, is_key: bool) {
    for (idx, c) in raw.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            // Whitespace would otherwise be trimmed away on parse
            ' ' if is_key || idx == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\x0c'),
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}
