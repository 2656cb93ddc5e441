//! Veripack CLI - Command-line utility for manifest-driven package
//! integrity verification.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Verify(args) => commands::verify::execute(args, &*formatter),
        cli::Commands::List(args) => commands::list::execute(args, &*formatter),
    };

    if let Err(error) = result {
        formatter.format_error(&error);
        std::process::exit(1);
    }
}
