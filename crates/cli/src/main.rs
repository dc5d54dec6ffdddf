use clap::Parser;
use kata_core::constants::{ENDPOINT_ENV, TOKEN_ENV, WORKSPACE_ENV};
use kata_core::Context;
use std::env;
use std::path::PathBuf;

mod commands;
mod terminal;

use commands::Commands;

#[derive(Parser)]
#[command(name = "kata")]
#[command(about = "Synchronize a local practice workspace with the remote platform", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace directory (defaults to $KATA_WORKSPACE, then the current directory)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Remote endpoint (defaults to $KATA_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// API token (defaults to $KATA_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Disable the response cache for this invocation
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

fn build_context(cli: &Cli) -> eyre::Result<Context> {
    let token = cli
        .token
        .clone()
        .or_else(|| env::var(TOKEN_ENV).ok())
        .ok_or_else(|| eyre::eyre!("no API token: pass --token or set {TOKEN_ENV}"))?;
    let workspace = match cli.workspace.clone() {
        Some(dir) => dir,
        None => match env::var(WORKSPACE_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => env::current_dir()?,
        },
    };

    let mut ctx = Context::new(workspace, token)?;
    let endpoint = cli.endpoint.clone().or_else(|| env::var(ENDPOINT_ENV).ok());
    if let Some(endpoint) = endpoint {
        ctx = ctx.with_endpoint(&endpoint)?;
    }
    if cli.no_cache {
        ctx = ctx.with_cache_dir(None);
    }
    Ok(ctx)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = build_context(&cli)?;
    cli.command.execute(ctx).await
}
