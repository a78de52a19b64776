use clap::Parser;
use tracing_subscriber::EnvFilter;

use liftcols::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag; stdout carries the table
    let filter = if cli.verbose {
        EnvFilter::new("liftcols=debug,info")
    } else {
        EnvFilter::new("liftcols=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    cli::convert::run(cli.args, cli.format)?;

    Ok(())
}
