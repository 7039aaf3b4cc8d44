//! The dispatch loop.
//!
//! Features and behaviors:
//! - The tape starts as a single zeroed cell and grows by one cell whenever
//!   the pointer moves past its right edge. It never shrinks.
//! - Moving left from cell 0 does nothing.
//! - Cells hold `0..=2^bits - 1` for any width of at least one bit, and wrap in
//!   both directions. Only host memory bounds the width.
//! - `,` stores `code_point % max_cell_value`; at end of input it stores 0.
//! - `.` emits the character whose code point is the cell value, or U+FFFD
//!   when the value is not a Unicode scalar value.
//! - Unrecognized characters are comments.
//! - A newline is written at the end of every run, optionally followed by a
//!   `Memory: [...]` dump.

use std::fs;
use std::path::Path;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::BfiError;
use crate::host::{InputSource, OutputSink, StdinSource, StdoutSink};
use crate::loops::{JumpTable, LoopIndex};
use crate::program::{Instruction, Position, Program};

/// Cell width used when none is configured.
pub const DEFAULT_CELL_BITS: i64 = 8;

/// Construction-time settings for an [`Evaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Cell width in bits. Must be at least 1.
    pub cell_size: i64,
    /// Print the tape after the run.
    pub memory_dump: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_BITS,
            memory_dump: false,
        }
    }
}

/// A validated cell width and the largest value it allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellWidth {
    bits: usize,
    max: BigUint,
}

impl CellWidth {
    pub fn new(bits: i64) -> Result<Self, BfiError> {
        let Some(bits) = usize::try_from(bits).ok().filter(|&b| b >= 1) else {
            return Err(BfiError::Configuration { cell_size: bits });
        };
        let max = (BigUint::one() << bits) - 1u32;
        Ok(Self { bits, max })
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    /// `2^bits - 1`.
    pub fn max_value(&self) -> &BigUint {
        &self.max
    }
}

/// What a finished run looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Instructions executed, comments excluded.
    pub steps: u64,
    /// Tape length at halt.
    pub tape_len: usize,
}

enum Flow {
    Next,
    Jump(Position),
}

/// Runs programs against a tape of unbounded unsigned cells, wrapped to a
/// [`CellWidth`].
///
/// Every call to [`Evaluator::eval`] starts from a fresh tape, so one instance
/// can run many programs, one at a time.
pub struct Evaluator<O = StdoutSink, I = StdinSource> {
    width: CellWidth,
    memory_dump: bool,
    tape: Vec<BigUint>,
    pointer: usize,
    cursor: Position,
    output: O,
    input: I,
}

impl Evaluator {
    /// An evaluator wired to stdout and stdin.
    pub fn new(cell_size: i64, memory_dump: bool) -> Result<Self, BfiError> {
        Self::with_io(EvalConfig { cell_size, memory_dump }, StdoutSink, StdinSource)
    }
}

impl<O: OutputSink, I: InputSource> Evaluator<O, I> {
    /// An evaluator wired to the given host collaborators.
    pub fn with_io(config: EvalConfig, output: O, input: I) -> Result<Self, BfiError> {
        let width = CellWidth::new(config.cell_size)?;
        Ok(Self {
            width,
            memory_dump: config.memory_dump,
            tape: vec![BigUint::zero()],
            pointer: 0,
            cursor: Position::default(),
            output,
            input,
        })
    }

    /// Read the script at `path` and evaluate it.
    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<RunSummary, BfiError> {
        let source = fs::read_to_string(path)?;
        self.eval(&source)
    }

    /// Evaluate `source` from a fresh tape.
    ///
    /// Returns a [`BfiError::Syntax`] without executing anything when brackets
    /// are unbalanced.
    pub fn eval(&mut self, source: &str) -> Result<RunSummary, BfiError> {
        self.reset();

        let program = Program::parse(source);
        tracing::debug!(lines = program.len(), cell_bits = self.width.bits(), "program loaded");
        let jumps = LoopIndex::build(&program)?;

        let mut steps: u64 = 0;
        while let Some(line_len) = program.line_len(self.cursor.line) {
            if self.cursor.column >= line_len {
                self.cursor = self.cursor.next_line();
                continue;
            }

            let decoded = program.char_at(self.cursor).and_then(Instruction::decode);
            let Some(instr) = decoded else {
                self.cursor = self.cursor.advance();
                continue;
            };

            steps += 1;
            self.cursor = match self.step(instr, &jumps)? {
                Flow::Next => self.cursor.advance(),
                Flow::Jump(target) => target,
            };
        }

        self.output.write_str("\n")?;
        if self.memory_dump {
            let dump = format!("Memory: {:?}\n", self.tape);
            self.output.write_str(&dump)?;
        }
        self.output.flush()?;

        tracing::debug!(steps, tape_len = self.tape.len(), "run finished");
        Ok(RunSummary {
            steps,
            tape_len: self.tape.len(),
        })
    }

    fn reset(&mut self) {
        self.tape.clear();
        self.tape.push(BigUint::zero());
        self.pointer = 0;
        self.cursor = Position::default();
    }

    fn step(&mut self, instr: Instruction, jumps: &JumpTable) -> Result<Flow, BfiError> {
        let max = self.width.max_value();

        match instr {
            Instruction::MoveRight => {
                if self.pointer + 1 >= self.tape.len() {
                    self.tape.push(BigUint::zero());
                }
                self.pointer += 1;
            }
            Instruction::MoveLeft => {
                self.pointer = self.pointer.saturating_sub(1);
            }
            Instruction::Increment => {
                let cell = &mut self.tape[self.pointer];
                if *cell >= *max {
                    cell.set_zero();
                } else {
                    *cell += 1u32;
                }
            }
            Instruction::Decrement => {
                let cell = &mut self.tape[self.pointer];
                if cell.is_zero() {
                    *cell = max.clone();
                } else {
                    *cell -= 1u32;
                }
            }
            Instruction::Output => {
                let ch = self.tape[self.pointer]
                    .to_u32()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                self.output.put(ch)?;
            }
            Instruction::Input => {
                self.output.flush()?;
                self.input.prompt()?;
                // Modulo max rather than max + 1, so `max` itself is never stored.
                self.tape[self.pointer] = match self.input.read_char()? {
                    Some(ch) => BigUint::from(u32::from(ch)) % max,
                    None => BigUint::zero(),
                };
            }
            Instruction::LoopOpen => {
                if self.tape[self.pointer].is_zero() {
                    return Ok(self.jump(jumps, "skip loop"));
                }
            }
            Instruction::LoopClose => {
                if !self.tape[self.pointer].is_zero() {
                    return Ok(self.jump(jumps, "repeat loop"));
                }
            }
        }

        Ok(Flow::Next)
    }

    fn jump(&self, jumps: &JumpTable, action: &'static str) -> Flow {
        match jumps.target(self.cursor) {
            Some(target) => {
                tracing::trace!(from = %self.cursor, to = %target, action, "jump");
                Flow::Jump(target)
            }
            // Every bracket is paired once LoopIndex::build succeeds.
            None => Flow::Next,
        }
    }

    pub fn tape(&self) -> &[BigUint] {
        &self.tape
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Largest value a cell can hold.
    pub fn max_cell_value(&self) -> &BigUint {
        self.width.max_value()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}
