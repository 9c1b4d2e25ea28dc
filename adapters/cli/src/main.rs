#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line launcher that boots the Grid Hunt server.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use grid_hunt_server::Server;
use grid_hunt_world::config::MapCatalog;
use grid_hunt_world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Flags accepted by the launcher.
#[derive(Debug, Parser)]
#[command(name = "grid-hunt", about = "Authoritative treasure hunt server")]
struct Args {
    /// Number of agents expected to connect.
    #[arg(short = 'n', long, default_value_t = 2)]
    nb_agents: u32,

    /// 1-based index of the map to load from the catalog.
    #[arg(short = 'm', long, default_value_t = 1)]
    map_index: usize,

    /// Path to the JSON map catalog.
    #[arg(long, default_value = "resources/maps.json")]
    map_file: PathBuf,

    /// Address the server listens on.
    #[arg(long, default_value = "127.0.0.1:5555")]
    bind: String,
}

/// Entry point for the Grid Hunt command-line interface.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("grid_hunt_server=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let text = fs::read_to_string(&args.map_file)
        .with_context(|| format!("reading {}", args.map_file.display()))?;
    let catalog = MapCatalog::from_json(&text).context("parsing map catalog")?;
    let map = catalog
        .map(args.map_index)
        .with_context(|| format!("catalog has no map {}", args.map_index))?;
    let world = World::from_map(map, args.nb_agents).context("building world")?;

    let server = Server::bind(&args.bind, world).await?;
    info!(
        addr = %server.local_addr(),
        nb_agents = args.nb_agents,
        map = args.map_index,
        "grid hunt server listening"
    );
    server.serve().await
}
