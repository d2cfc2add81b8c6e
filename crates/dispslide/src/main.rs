mod cli;
mod paths;
mod run;

use anyhow::Result;
use cli::Command;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config) => run::print_config(&cli.slider),
        Some(Command::Assets) => run::check_assets(&cli.slider),
        None => run::run(&cli.slider),
    }
}
