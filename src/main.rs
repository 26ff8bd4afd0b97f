use std::io;
use std::process;

use clap::Parser;
use env_logger::Env;

use ex2md::cli::{run, Args};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let stdout = io::stdout();
    if let Err(e) = run(&args, &mut stdout.lock()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
