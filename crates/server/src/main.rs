//! metadir: versioned metadata directory server.
//!
//! `metadir [--config FILE] [--answers FILE] [--listen ADDR] ...`

use anyhow::Context;
use metadir_server::cli::{build_cli, resolve_config};
use metadir_server::{logging, MetadataServer, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();

    if matches.get_flag("print-config") {
        print!("{}", ServerConfig::default_toml());
        return Ok(());
    }

    let config = resolve_config(&matches)?;
    logging::init(config.debug, config.log_file.as_deref())
        .context("Failed to open log file")?;

    info!(target: "metadir::server", "Starting metadir");
    let server = MetadataServer::new(config)?;
    server.run().await?;
    Ok(())
}
