use std::fmt;

/// Errors surfaced by the interpreter.
///
/// Only two of these are interpreter faults proper: [`BfiError::Syntax`] is raised
/// while matching brackets, before any instruction runs, and
/// [`BfiError::Configuration`] is raised when an [`crate::Evaluator`] is built.
/// [`BfiError::Io`] covers the host side (reading the script, stdin, stdout).
#[derive(Debug, thiserror::Error)]
pub enum BfiError {
    /// Loops were not balanced. `line` and `column` are 1-based and refer to
    /// the raw source text.
    #[error("[Syntax error] {kind} in line {line} at position {column}")]
    Syntax {
        kind: BracketError,
        line: usize,
        column: usize,
    },

    /// The requested cell width is below one bit.
    #[error("[Interpreter exception] Cell size cannot be less than 1")]
    Configuration { cell_size: i64 },

    /// An underlying I/O error from the host environment.
    #[error("{source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl BfiError {
    /// 1-based source location of a syntax error.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            BfiError::Syntax { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}

/// Which side of a loop was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketError {
    /// A `]` appeared with no pending `[`.
    UnexpectedClose,
    /// A `[` was never closed.
    Unclosed,
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::UnexpectedClose => write!(f, "Unexpected closing bracket"),
            BracketError::Unclosed => write!(f, "Unclosed bracket"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_messages_use_one_based_locations() {
        let err = BfiError::Syntax { kind: BracketError::UnexpectedClose, line: 3, column: 7 };
        assert_eq!(err.to_string(), "[Syntax error] Unexpected closing bracket in line 3 at position 7");
        assert_eq!(err.location(), Some((3, 7)));

        let err = BfiError::Syntax { kind: BracketError::Unclosed, line: 1, column: 1 };
        assert_eq!(err.to_string(), "[Syntax error] Unclosed bracket in line 1 at position 1");
    }

    #[test]
    fn configuration_messages() {
        let err = BfiError::Configuration { cell_size: 0 };
        assert_eq!(err.to_string(), "[Interpreter exception] Cell size cannot be less than 1");
        assert_eq!(err.location(), None);
    }
}
