//! Host-side collaborators used by the evaluator for `.` and `,`.
//!
//! [`StdoutSink`] and [`StdinSource`] talk to the process's standard streams.
//! `String` and [`ScriptedInput`] keep everything in memory, for embedding the
//! interpreter or inspecting a run.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Prompt shown before a character is read.
pub const INPUT_PROMPT: &str = "Enter a character: ";

/// Receives program output.
pub trait OutputSink {
    /// Emit one character for the `.` instruction.
    fn put(&mut self, ch: char) -> io::Result<()>;

    /// Emit arbitrary text (end-of-run newline, memory dump, prompts).
    fn write_str(&mut self, s: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Supplies characters for the `,` instruction.
pub trait InputSource {
    /// Called right before [`InputSource::read_char`].
    fn prompt(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Next input character, or `None` at end of input.
    fn read_char(&mut self) -> io::Result<Option<char>>;
}

impl OutputSink for String {
    fn put(&mut self, ch: char) -> io::Result<()> {
        self.push(ch);
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.push_str(s);
        Ok(())
    }
}

/// Writes to stdout.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn put(&mut self, ch: char) -> io::Result<()> {
        let mut buf = [0u8; 4];
        io::stdout().write_all(ch.encode_utf8(&mut buf).as_bytes())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        io::stdout().write_all(s.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// Reads UTF-8 characters from stdin one at a time.
///
/// The prompt goes to stdout, like program output, and is flushed so it shows
/// up before the read blocks.
#[derive(Debug, Default)]
pub struct StdinSource;

impl InputSource for StdinSource {
    fn prompt(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(INPUT_PROMPT.as_bytes())?;
        stdout.flush()
    }

    fn read_char(&mut self) -> io::Result<Option<char>> {
        read_utf8_char(&mut io::stdin().lock())
    }
}

/// Decode a single UTF-8 character from `reader`.
///
/// Malformed or truncated sequences decode to U+FFFD.
pub fn read_utf8_char<R: Read>(reader: &mut R) -> io::Result<Option<char>> {
    let mut buf = [0u8; 4];
    if reader.read(&mut buf[..1])? == 0 {
        return Ok(None);
    }

    let width = match buf[0] {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
    };

    let mut filled = 1;
    while filled < width {
        let n = reader.read(&mut buf[filled..width])?;
        if n == 0 {
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        }
        filled += n;
    }

    let ch = std::str::from_utf8(&buf[..width])
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Ok(Some(ch))
}

/// A fixed queue of input characters.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending: VecDeque<char>,
    prompts: usize,
}

impl ScriptedInput {
    pub fn new(input: &str) -> Self {
        Self {
            pending: input.chars().collect(),
            prompts: 0,
        }
    }

    /// How many times a prompt was requested.
    pub fn prompts(&self) -> usize {
        self.prompts
    }
}

impl InputSource for ScriptedInput {
    fn prompt(&mut self) -> io::Result<()> {
        self.prompts += 1;
        Ok(())
    }

    fn read_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.pending.pop_front())
    }
}
