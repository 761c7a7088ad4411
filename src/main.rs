mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands;
use netpatch::Config;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    let cli = cli::Cli::parse();

    // Setup tracing; RUST_LOG overrides the -v level
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    // Run the command and handle errors gracefully
    if let Err(err) = run_command(cli) {
        commands::display_error(&err);
        std::process::exit(1);
    }
}

fn run_command(cli: cli::Cli) -> Result<()> {
    use cli::Commands;

    let config_path = cli.config;
    let root = cli.root;
    let load = || -> Result<Config> {
        Ok(Config::load(config_path.as_deref())?.with_root(root.clone()))
    };

    match cli.command {
        Commands::Show { json } => commands::show::handle(&load()?, json),
        Commands::Dns { servers, write } => commands::dns::handle(&load()?, &servers, &write),
        Commands::Router { address, clear, write } => {
            commands::router::handle(&load()?, address, clear, &write)
        }
        Commands::Nm { state, write } => commands::nm::handle(&load()?, state, &write),
        Commands::Iface(args) => commands::iface::handle(&load()?, args),
        Commands::Apply => commands::apply::handle(&load()?),
        Commands::Config { action } => commands::config::handle(action, config_path.as_deref()),
    }
}
