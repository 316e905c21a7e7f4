//! Weft IDL compiler CLI.

use std::io::{self, IsTerminal};

use weft_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use weftc::{init_tracing, parse_args, run, Command, EXIT_USAGE, USAGE};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match parse_args(&args) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Command::Compile(options)) => options,
        Err(diag) => {
            let stderr = io::stderr();
            let is_tty = stderr.is_terminal();
            let mut emitter = TerminalEmitter::with_color_mode(stderr.lock(), ColorMode::Auto, is_tty);
            emitter.emit(&diag);
            emitter.flush();
            std::process::exit(EXIT_USAGE);
        }
    };

    let stderr = io::stderr();
    let is_tty = stderr.is_terminal();
    let code = run(&options, &mut stderr.lock(), is_tty);
    std::process::exit(code);
}
