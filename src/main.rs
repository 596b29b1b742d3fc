use clap::Parser;
use sigchart::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
