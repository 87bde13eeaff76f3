//! toyhash - print the ToyHash of a single argument.

use std::io::{self, Write};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = toyhash::cli::run(std::env::args_os().skip(1), &mut out).and_then(|_| out.flush());

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
