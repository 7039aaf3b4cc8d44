//! Bracket matching.
//!
//! [`LoopIndex::build`] walks a [`Program`] once and pairs every `[` with its
//! `]`, producing a [`JumpTable`] the evaluator consults for O(1) jumps.

use std::collections::HashMap;

use crate::error::{BfiError, BracketError};
use crate::program::{Instruction, Position, Program};

/// Matching loop delimiters, in both directions. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    close_of: HashMap<Position, Position>,
    open_of: HashMap<Position, Position>,
}

impl JumpTable {
    /// The `]` matching the `[` at `open`.
    pub fn close_of(&self, open: Position) -> Option<Position> {
        self.close_of.get(&open).copied()
    }

    /// The `[` matching the `]` at `close`.
    pub fn open_of(&self, close: Position) -> Option<Position> {
        self.open_of.get(&close).copied()
    }

    /// The partner of the bracket at `pos`, whichever side it is.
    pub fn target(&self, pos: Position) -> Option<Position> {
        self.close_of(pos).or_else(|| self.open_of(pos))
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.close_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close_of.is_empty()
    }
}

/// Builds [`JumpTable`]s.
pub struct LoopIndex;

impl LoopIndex {
    /// Pair up the brackets of `program`.
    ///
    /// A stray `]` is reported at its own location. When brackets are left open
    /// at the end, the oldest one still pending is reported.
    pub fn build(program: &Program) -> Result<JumpTable, BfiError> {
        let mut table = JumpTable::default();
        let mut stack: Vec<Position> = Vec::new();

        for (pos, ch) in program.chars() {
            match Instruction::decode(ch) {
                Some(Instruction::LoopOpen) => stack.push(pos),
                Some(Instruction::LoopClose) => {
                    let Some(open) = stack.pop() else {
                        return Err(syntax_error(program, BracketError::UnexpectedClose, pos));
                    };
                    table.close_of.insert(open, pos);
                    table.open_of.insert(pos, open);
                }
                _ => {}
            }
        }

        if let Some(&oldest) = stack.first() {
            return Err(syntax_error(program, BracketError::Unclosed, oldest));
        }

        tracing::debug!(pairs = table.len(), "jump table built");
        Ok(table)
    }
}

fn syntax_error(program: &Program, kind: BracketError, pos: Position) -> BfiError {
    BfiError::Syntax {
        kind,
        line: program.source_line(pos.line).unwrap_or(pos.line + 1),
        column: pos.column + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> Result<JumpTable, BfiError> {
        LoopIndex::build(&Program::parse(source))
    }

    #[test]
    fn nested_loops_pair_up_both_ways() {
        let table = build("+[>[-]<-]").expect("balanced");
        assert_eq!(table.len(), 2);
        assert_eq!(table.close_of(Position::new(0, 1)), Some(Position::new(0, 8)));
        assert_eq!(table.close_of(Position::new(0, 3)), Some(Position::new(0, 5)));

        for open in [Position::new(0, 1), Position::new(0, 3)] {
            let close = table.close_of(open).unwrap();
            assert_eq!(table.open_of(close), Some(open));
            assert_eq!(table.target(open), Some(close));
            assert_eq!(table.target(close), Some(open));
        }
    }

    #[test]
    fn loops_may_span_lines() {
        let table = build("[\n\n+\n]").expect("balanced");
        assert_eq!(table.close_of(Position::new(0, 0)), Some(Position::new(2, 0)));
    }

    #[test]
    fn program_without_loops_has_empty_table() {
        let table = build("+-<>., hello").expect("no brackets");
        assert!(table.is_empty());
        assert_eq!(table.target(Position::new(0, 0)), None);
    }

    #[test]
    fn stray_close_reports_its_own_location() {
        let err = build("+[]]").unwrap_err();
        assert!(matches!(
            err,
            BfiError::Syntax { kind: BracketError::UnexpectedClose, line: 1, column: 4 }
        ));
    }

    #[test]
    fn stray_close_location_counts_blank_source_lines() {
        let err = build("+\n\n  ]").unwrap_err();
        assert_eq!(err.location(), Some((3, 3)));
        assert_eq!(err.to_string(), "[Syntax error] Unexpected closing bracket in line 3 at position 3");
    }

    #[test]
    fn bare_carriage_return_ends_a_line() {
        let err = build("+\r]").unwrap_err();
        assert_eq!(err.location(), Some((2, 1)));
        assert_eq!(err.to_string(), "[Syntax error] Unexpected closing bracket in line 2 at position 1");
    }

    #[test]
    fn unclosed_reports_outermost_pending_open() {
        let err = build("[[-]").unwrap_err();
        assert!(matches!(
            err,
            BfiError::Syntax { kind: BracketError::Unclosed, line: 1, column: 1 }
        ));

        let err = build("+\n[ [\n[-]").unwrap_err();
        assert_eq!(err.location(), Some((2, 1)));
    }
}
