//! Alias line codec
//!
//! Converts between the text of the managed alias file and an in-memory
//! name → command mapping. The emitted file is directly sourceable by zsh:
//!
//! ```text
//! # Managed by Zsh Alias Manager (zam)
//! alias gs='git status'
//! alias say='echo it'\''s fine'
//! ```
//!
//! Parsing is forgiving: comments, blank lines, foreign statements and
//! malformed `alias` lines are skipped without error.

use std::collections::BTreeMap;

/// First line of every file written by [`serialize`]
pub const HEADER: &str = "# Managed by Zsh Alias Manager (zam)";

const PREFIX: &str = "alias ";

/// A single quote inside a single-quoted shell string: close, escaped quote, reopen
const ESCAPED_QUOTE: &str = r"'\''";

pub type AliasMap = BTreeMap<String, String>;

/// Parse alias file text into a mapping. Later definitions of a name win.
pub fn parse(text: &str) -> AliasMap {
    let mut aliases = AliasMap::new();
    for line in text.lines() {
        if let Some((name, command)) = parse_line(line) {
            aliases.insert(name, command);
        }
    }
    aliases
}

/// Parse one line, returning `None` for anything that is not an alias definition
pub fn parse_line(line: &str) -> Option<(String, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let rest = trimmed.strip_prefix(PREFIX)?;
    let (name, raw) = rest.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), unquote_value(raw)))
}

/// Strip one enclosing pair of matching quotes and undo `'\''` escaping
pub fn unquote_value(raw: &str) -> String {
    let raw = raw.trim();
    let inner = ['\'', '"']
        .iter()
        .find_map(|quote| {
            if raw.len() >= 2 && raw.starts_with(*quote) && raw.ends_with(*quote) {
                Some(&raw[1..raw.len() - 1])
            } else {
                None
            }
        })
        .unwrap_or(raw);
    inner.replace(ESCAPED_QUOTE, "'")
}

pub fn escape_command(command: &str) -> String {
    command.replace('\'', ESCAPED_QUOTE)
}

/// Render `alias <name>='<escaped>'`
pub fn format_line(name: &str, command: &str) -> String {
    format!("{}{}='{}'", PREFIX, name, escape_command(command))
}

/// Serialize aliases into the managed file format.
///
/// Output is sorted by name regardless of the order of `entries`, starts with
/// [`HEADER`] and ends with exactly one newline. A name given twice keeps its
/// last command.
pub fn serialize<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let sorted: BTreeMap<&String, &String> = entries.into_iter().collect();
    let mut lines = Vec::with_capacity(sorted.len() + 1);
    lines.push(HEADER.to_string());
    lines.extend(sorted.into_iter().map(|(name, command)| format_line(name, command)));
    let mut text = lines.join("\n");
    text.push('\n');
    text
}
