mod api;
mod commands;
mod terminal;

use std::net::SocketAddr;

use commands::{CommandLine, Commands, ping, scan, serve};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse_args();

    logging::init(cli.verbose);

    let coordinator = commands::build_coordinator(cli.scan_config());

    match cli.command {
        Commands::Serve { host, port } => {
            serve::serve(coordinator, SocketAddr::new(host, port)).await
        }
        Commands::Scan { range } => {
            scan::scan(&coordinator, range.as_deref(), cli.verbose > 0).await
        }
        Commands::Ping { ip } => ping::ping(&coordinator, &ip).await,
    }
}
