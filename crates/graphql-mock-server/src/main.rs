use std::path::PathBuf;

use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use graphql_mock_server::server::Server;
use tracing::info;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the GraphQL mock server
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = STYLES,
    about = "GraphQL Mock Server - serve randomized data shaped by any GraphQL schema",
)]
struct Args {
    /// Path to the config file
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config: runtime::Config = match Args::parse().config {
        Some(config_path) => runtime::read_config(config_path)?,
        None => runtime::read_config_from_env()?,
    };

    // WorkerGuard must stay alive to flush file logs on exit
    let _guard = config.logging.setup()?;

    info!(
        "GraphQL Mock Server v{} // Licensed under MIT",
        std::env!("CARGO_PKG_VERSION")
    );

    let custom_scalar_map = config.mocks.custom_scalar_map()?;

    Ok(Server::builder()
        .schema_path(config.schema)
        .address(config.address)
        .port(config.port)
        .introspection(config.introspection)
        .list_length(config.mocks.list_length)
        .maybe_custom_scalar_map(custom_scalar_map)
        .cors(config.cors)
        .health_check(config.health_check)
        .drain_timeout(config.drain_timeout)
        .build()
        .start()
        .await?)
}
