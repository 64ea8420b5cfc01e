use clap::Parser;
use rag_agent::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::Ask(args) => cli::ask::run(args).await,
    }
}
