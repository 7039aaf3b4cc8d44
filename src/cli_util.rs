use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::BfiError;
use crate::program::source_lines;

/// Print an interpreter error to stderr. Syntax errors also show the offending
/// source line with a caret under the bracket.
/// If `program` is `Some("bfi")`, the message is prefixed with "bfi: ".
pub fn print_error(program: Option<&str>, source: Option<&str>, err: &BfiError) {
    let msg = match program {
        Some(p) => format!("{p}: {err}"),
        None => err.to_string(),
    };
    eprintln!("{}", paint(&msg));

    if let (Some(code), Some((line, column))) = (source, err.location()) {
        if let Some(context) = caret_context(code, line, column) {
            eprintln!("{context}");
        }
    }
    let _ = io::stderr().flush();
}

/// Red when stderr is a terminal, plain otherwise.
pub fn paint(msg: &str) -> String {
    if io::stderr().is_terminal() {
        Color::Red.bold().paint(msg).to_string()
    } else {
        msg.to_string()
    }
}

/// Two lines: the 1-based source `line` (truncated around `column`) and a
/// caret under `column`.
pub fn caret_context(code: &str, line: usize, column: usize) -> Option<String> {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let text = source_lines(code).nth(line.checked_sub(1)?)?;
    let pos = column.checked_sub(1)?;

    let total_chars = text.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);
    let slice: String = text
        .chars()
        .skip(start_char)
        .take(end_char.saturating_sub(start_char))
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect();

    let underline = format!("{}^", " ".repeat(pos - start_char));
    Some(format!("  {slice}\n  {underline}"))
}
