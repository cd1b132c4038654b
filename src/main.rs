use clap::Parser;
use stockprofit::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
