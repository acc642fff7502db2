use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use tictactoe_host::{Listener, ServerArgs, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    logger::init(args.verbose);

    let config = args.into_config();
    let listener = Listener::bind(config)
        .await
        .context("starting tic-tac-toe server")?;
    info!(addr = %listener.local_addr()?, "=== Tic Tac Toe Server ===");

    let summary = listener
        .serve(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(%err, "cannot listen for ctrl-c, stopping");
            }
        })
        .await;

    info!(
        games = summary.started,
        completed = summary.completed,
        failed = summary.failed,
        "server stopped"
    );
    Ok(())
}
