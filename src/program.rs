//! Source text split into executable lines.
//!
//! Blank and whitespace-only lines are dropped when a [`Program`] is parsed, so
//! every [`Position`] indexes the filtered lines. Each kept line remembers where
//! it came from in the raw text for error messages.

use std::fmt;

/// One instruction of the language. Anything else in the source is a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    MoveRight,
    MoveLeft,
    Increment,
    Decrement,
    Output,
    Input,
    LoopOpen,
    LoopClose,
}

impl Instruction {
    /// Decode a source character, returning `None` for comment characters.
    pub fn decode(ch: char) -> Option<Self> {
        match ch {
            '>' => Some(Instruction::MoveRight),
            '<' => Some(Instruction::MoveLeft),
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '.' => Some(Instruction::Output),
            ',' => Some(Instruction::Input),
            '[' => Some(Instruction::LoopOpen),
            ']' => Some(Instruction::LoopClose),
            _ => None,
        }
    }
}

/// A `(line, column)` cursor into a [`Program`], both 0-based.
///
/// `column` may equal the line length, meaning "continue on the next line".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The next column on the same line.
    pub fn advance(self) -> Self {
        Self::new(self.line, self.column + 1)
    }

    /// Column 0 of the following line.
    pub fn next_line(self) -> Self {
        Self::new(self.line + 1, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Split `source` into lines without their terminators.
///
/// Besides `\n` and `\r\n`, a bare `\r`, vertical tab, form feed, the
/// `\x1c`..`\x1e` separators, NEL, U+2028 and U+2029 all end a line. A
/// terminator at the very end does not start an extra empty line.
pub fn source_lines(source: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = source;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let Some((at, brk)) = rest.char_indices().find(|&(_, c)| is_line_break(c)) else {
            return Some(std::mem::take(&mut rest));
        };

        let line = &rest[..at];
        let mut next = at + brk.len_utf8();
        if brk == '\r' && rest[next..].starts_with('\n') {
            next += 1;
        }
        rest = &rest[next..];
        Some(line)
    })
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    // 1-based line number in the raw source.
    source_line: usize,
    chars: Vec<char>,
}

/// The non-blank lines of a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    lines: Vec<Line>,
}

impl Program {
    /// Split `source` into lines and keep the ones with visible content.
    pub fn parse(source: &str) -> Self {
        let lines = source_lines(source)
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(index, text)| Line {
                source_line: index + 1,
                chars: text.chars().collect(),
            })
            .collect();

        Self { lines }
    }

    /// Number of kept lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Length in characters of the kept line at `line`, or `None` past the end.
    pub fn line_len(&self, line: usize) -> Option<usize> {
        self.lines.get(line).map(|l| l.chars.len())
    }

    /// 1-based raw source line number of the kept line at `line`.
    pub fn source_line(&self, line: usize) -> Option<usize> {
        self.lines.get(line).map(|l| l.source_line)
    }

    pub fn char_at(&self, pos: Position) -> Option<char> {
        self.lines.get(pos.line)?.chars.get(pos.column).copied()
    }

    /// Every character with its position, in line-then-column order.
    pub fn chars(&self) -> impl Iterator<Item = (Position, char)> + '_ {
        self.lines.iter().enumerate().flat_map(|(line, l)| {
            l.chars
                .iter()
                .enumerate()
                .map(move |(column, &ch)| (Position::new(line, column), ch))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_dropped_but_source_lines_are_kept() {
        let program = Program::parse("+\n\n   \n-\r\n\t\n.");
        assert_eq!(program.len(), 3);
        assert_eq!(program.source_line(0), Some(1));
        assert_eq!(program.source_line(1), Some(4));
        assert_eq!(program.source_line(2), Some(6));
        assert_eq!(program.char_at(Position::new(1, 0)), Some('-'));
        assert_eq!(program.line_len(1), Some(1));
        assert_eq!(program.line_len(3), None);
    }

    #[test]
    fn empty_source_has_no_lines() {
        assert!(Program::parse("").is_empty());
        assert!(Program::parse("\n \n").is_empty());
    }

    #[test]
    fn chars_are_visited_line_then_column() {
        let program = Program::parse("ab\n\nc");
        let seen: Vec<_> = program.chars().collect();
        assert_eq!(
            seen,
            vec![
                (Position::new(0, 0), 'a'),
                (Position::new(0, 1), 'b'),
                (Position::new(1, 0), 'c'),
            ]
        );
    }

    #[test]
    fn decode_recognizes_only_the_eight_commands() {
        let decoded: Vec<_> = "><+-.,[]".chars().filter_map(Instruction::decode).collect();
        assert_eq!(
            decoded,
            vec![
                Instruction::MoveRight,
                Instruction::MoveLeft,
                Instruction::Increment,
                Instruction::Decrement,
                Instruction::Output,
                Instruction::Input,
                Instruction::LoopOpen,
                Instruction::LoopClose,
            ]
        );
        assert_eq!(Instruction::decode('a'), None);
        assert_eq!(Instruction::decode(' '), None);
    }

    #[test]
    fn every_line_terminator_splits() {
        let lines: Vec<_> = source_lines("a\nb\r\nc\rd\u{0b}e\u{0c}f\u{1c}g\u{1d}h\u{1e}i\u{85}j\u{2028}k\u{2029}l").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l"]);
    }

    #[test]
    fn trailing_terminator_adds_no_line() {
        assert_eq!(source_lines("+\n").collect::<Vec<_>>(), vec!["+"]);
        assert_eq!(source_lines("+\r\n\r\n").collect::<Vec<_>>(), vec!["+", ""]);
        assert_eq!(source_lines("\n").collect::<Vec<_>>(), vec![""]);
        assert_eq!(source_lines("").count(), 0);
    }

    #[test]
    fn bare_carriage_return_starts_a_new_line() {
        let program = Program::parse("+\r]");
        assert_eq!(program.len(), 2);
        assert_eq!(program.source_line(1), Some(2));
        assert_eq!(program.char_at(Position::new(1, 0)), Some(']'));

        let program = Program::parse("+\r\r \r-");
        assert_eq!(program.len(), 2);
        assert_eq!(program.source_line(1), Some(4));
    }
}
