// AgentConf CLI entry point

mod cli;
mod run;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Org(args) => run::run_org(args).await,
        Command::Local(args) => run::run_local(args).await,
    };

    match result {
        Ok(summary) => {
            // A run with per-package failures is still a completed run
            run::print_summary(&summary);
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
