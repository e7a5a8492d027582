mod blocks_cmd;
mod cli;
mod lines_cmd;
mod message_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        cli::Commands::Message {
            ref file,
            flat,
            at,
            format,
            ref template,
        } => message_cmd::run(file, flat, at, format, template),
        cli::Commands::Lines {
            ref file,
            flat,
            ref template,
        } => lines_cmd::run(file, flat, template),
        cli::Commands::Blocks {
            ref file,
            flat,
            format,
            ref template,
        } => blocks_cmd::run(file, flat, format, template),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
