//! soxlex command-line entry point.

use std::io::{self, Write};

use soxlex::{execute, init_tracing, parse_args, CliError, USAGE};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            std::process::exit(err.exit_code());
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = execute(&command, &mut out).and_then(|()| out.flush().map_err(CliError::Output));
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}
