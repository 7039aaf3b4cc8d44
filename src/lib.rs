//! A small Brainfuck interpreter library.
//!
//! Programs run on a tape that starts with one zeroed cell and grows to the
//! right on demand. Cell width is configurable from 1 to 64 bits and
//! arithmetic wraps within it. Characters outside `><+-.,[]` are comments.
//! Unbalanced brackets are reported before anything executes.
//!
//! Quick start:
//!
//! ```no_run
//! use bfi::Evaluator;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut bf = Evaluator::new(8, false).expect("8-bit cells are valid");
//! bf.eval(code).expect("program should run");
//! ```
//!
//! Capturing output instead of writing to stdout:
//!
//! ```
//! use bfi::{EvalConfig, Evaluator, ScriptedInput};
//!
//! let mut bf = Evaluator::with_io(EvalConfig::default(), String::new(), ScriptedInput::new("")).unwrap();
//! bf.eval("++++++++[>++++++++<-]>+.").unwrap();
//! assert_eq!(bf.output(), "A\n");
//! assert_eq!(bf.tape().len(), 2);
//! assert_eq!(bf.tape()[1], 65u32.into());
//! ```

use std::sync::Once;

pub mod cli_util;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod loops;
pub mod program;

pub use error::{BfiError, BracketError};
pub use evaluator::{CellWidth, EvalConfig, Evaluator, RunSummary};
pub use host::{InputSource, OutputSink, ScriptedInput, StdinSource, StdoutSink};
pub use loops::{JumpTable, LoopIndex};
pub use program::{Instruction, Position, Program};

/// Environment variable holding the log filter, e.g. `BFI_LOG=bfi=trace`.
pub const LOG_ENV: &str = "BFI_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a stderr log subscriber when `BFI_LOG` is set.
///
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        // Only initialize if BFI_LOG is set
        if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
