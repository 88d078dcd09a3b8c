//! CLI entry point: an interactive REPL reading programs from stdin.

use std::io::{self, Read};
use std::process;

use log::error;

use scalarc::llvm::{self, Context};
use scalarc::{driver, CompileContext};

fn parse_args() -> Result<bool, String> {
    let mut quiet = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-q" | "--quiet" => quiet = true,
            other => return Err(format!("unrecognized flag `{}`", other)),
        }
    }
    Ok(quiet)
}

fn main() {
    env_logger::init();

    let quiet = match parse_args() {
        Ok(quiet) => quiet,
        Err(msg) => {
            eprintln!("scalarc: {}", msg);
            process::exit(2);
        }
    };

    if let Err(msg) = llvm::target::initialize_native_target() {
        eprintln!("scalarc: {}", msg);
        process::exit(1);
    }

    let mut input = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut input) {
        eprintln!("scalarc: failed to read stdin: {}", err);
        process::exit(1);
    }

    let context = Context::new();
    let mut ctx = match CompileContext::new(&context, quiet) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    };

    driver::run(&input, &mut ctx);
}
