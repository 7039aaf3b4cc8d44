use bfi::cli_util::{paint, print_error};
use bfi::config::{self, Overrides, Settings};
use bfi::{BfiError, Evaluator};
use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <SCRIPT>      # Run the Brainfuck script in file SCRIPT
  {0} [OPTIONS] -e "<code>"   # Run Brainfuck code given inline

Options:
  --cell-size, -c <BITS>  Set single cell size in bits, at least 1 (default = 8)
  --memory-dump, -m       Show memory dump at the end of script execution
  --config <PATH>         Read settings from PATH instead of <config home>/bfi.toml
  --eval, -e <code>       Run <code> instead of a script file
  --help, -h              Show this help

Environment:
  BFI_CELL_SIZE, BFI_MEMORY_DUMP  Used when the matching flag is not given
  BFI_CONFIG                      Config file location
  BFI_LOG                         Log filter for diagnostics on stderr (e.g. bfi=debug)

Notes:
- Characters outside of Brainfuck's ><+-.,[] are comments; blank lines are skipped.
- Input (`,`) prompts for one character and stores its code point modulo the
  largest cell value; on EOF the current cell is set to 0.
- Output ends with a newline.
- Program output and the input prompt go to stdout; this help, warnings and
  error messages (including syntax errors) go to stderr.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bfi", disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Cell size in bits (fallback BFI_CELL_SIZE, then config file; default 8)
    #[arg(short = 'c', long = "cell-size", value_name = "BITS", allow_negative_numbers = true)]
    cell_size: Option<i64>,

    /// Print the tape after the run
    #[arg(short = 'm', long = "memory-dump")]
    memory_dump: bool,

    /// Config file (fallback BFI_CONFIG, then <config home>/bfi.toml)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Inline Brainfuck code
    #[arg(short = 'e', long = "eval", value_name = "code", conflicts_with = "script", allow_hyphen_values = true)]
    eval: Option<String>,

    /// Script file to run
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn load_settings(program: &str, cli: &Cli) -> Settings {
    let lookup = |key: &str| env::var(key).ok();

    let path = cli.config.clone().or_else(|| config::config_path(lookup));
    let file = match path.as_deref().map(config::load_file) {
        Some(Ok(file)) => file,
        Some(Err(e)) => {
            eprintln!("{}", paint(&format!("{program}: warning: {e}")));
            None
        }
        None => None,
    };

    let overrides = Overrides {
        cell_size: cli.cell_size,
        memory_dump: cli.memory_dump.then_some(true),
    };
    Settings::resolve(overrides, lookup, file.as_ref())
}

fn run(program: &str, cli: Cli) -> i32 {
    let settings = load_settings(program, &cli);
    tracing::debug!(?settings, "settings resolved");

    let mut bf = match Evaluator::new(settings.cell_size, settings.memory_dump) {
        Ok(bf) => bf,
        Err(err) => {
            print_error(Some(program), None, &err);
            return 1;
        }
    };

    let code = match (cli.eval, cli.script) {
        (Some(code), _) => code,
        (None, Some(path)) => match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", paint(&format!("{program}: {}: {e}", path.display())));
                let _ = io::stderr().flush();
                return 1;
            }
        },
        (None, None) => usage_and_exit(program, 0),
    };

    match bf.eval(&code) {
        Ok(_) => 0,
        // Syntax errors are reported and the run simply ends.
        Err(err @ BfiError::Syntax { .. }) => {
            print_error(Some(program), Some(&code), &err);
            0
        }
        Err(err) => {
            print_error(Some(program), None, &err);
            1
        }
    }
}

fn main() {
    bfi::init_tracing();

    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bfi"));

    let cli = Cli::parse();

    if cli.help || (cli.script.is_none() && cli.eval.is_none()) {
        usage_and_exit(&program, 0);
    }

    // Install SIGINT (ctrl+c) handler to flush pending output before exiting
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        tracing::warn!(error = %e, "failed to set ctrl+c handler");
    }

    std::process::exit(run(&program, cli));
}
