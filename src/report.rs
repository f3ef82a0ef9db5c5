use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::aggregate::AggregatedEntry;
use crate::error::ReportError;

const HEADER: &str =
    "| Time | Title | Feed | IsNew | IsToday |\n|------|-------|------|-------|--------|\n";
const ELLIPSIS: &str = "...";

/// Order entries new-first, then today-first. The sort is stable, so ties keep
/// aggregation order.
pub fn sort_entries(entries: &mut [AggregatedEntry]) {
    entries.sort_by_key(|entry| (!entry.is_new, !entry.is_today));
}

/// Make a title safe for a markdown table cell and link text.
///
/// Line breaks become spaces, `|`, `[` and `]` are backslash-escaped unless
/// already escaped, a trailing odd run of backslashes is evened out, and the
/// result is cut to `max_len` characters plus `...`.
pub fn sanitize_title(title: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(title.len());
    let mut backslashes = 0usize;

    for c in title.chars() {
        match c {
            '\n' | '\r' => out.push(' '),
            '|' | '[' | ']' if backslashes % 2 == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
        backslashes = if c == '\\' { backslashes + 1 } else { 0 };
    }
    // A trailing lone backslash would escape the link's closing bracket
    if backslashes % 2 == 1 {
        out.push('\\');
    }

    match out.char_indices().nth(max_len) {
        Some((cut, _)) => {
            out.truncate(cut);
            out.push_str(ELLIPSIS);
            out
        }
        None => out,
    }
}

fn yes(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        ""
    }
}

/// Render the markdown table for already sorted entries.
pub fn render(entries: &[AggregatedEntry], max_title_len: usize) -> String {
    let mut out = String::from(HEADER);
    for entry in entries {
        out.push_str(&format!(
            "| {} | [{}]({}) | {} | {} | {} |\n",
            entry.pub_date,
            sanitize_title(&entry.title, max_title_len),
            entry.guid,
            entry.feeds_label(),
            yes(entry.is_new),
            yes(entry.is_today),
        ));
    }
    out
}

/// Read the previous report as plain text. A missing file reads as empty.
pub fn read_prior_report(path: &Path) -> Result<String, ReportError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(ReportError::ReadPrior {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Create or overwrite the report file with `content`.
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    let mut file = File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(content.as_bytes()).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
