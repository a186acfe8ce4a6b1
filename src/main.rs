use amazons_arena::{ConfigError, GameConfig, web::run_server};
use std::net::SocketAddr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS: &str = "settings.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// An explicit settings path must load; the default one may be absent.
fn load_config(path: Option<String>) -> Result<GameConfig, ConfigError> {
    match path {
        Some(path) => GameConfig::load(path),
        None if Path::new(DEFAULT_SETTINGS).exists() => GameConfig::load(DEFAULT_SETTINGS),
        None => {
            warn!("{} not found, using default settings", DEFAULT_SETTINGS);
            Ok(GameConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Amazons Arena");

    let config = load_config(std::env::args().nth(1))?;
    info!(
        "Settings loaded: {}x{} board, {} starts",
        config.board_width, config.board_height, config.starting_player
    );

    let addr: SocketAddr = std::env::var("AMAZONS_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;

    run_server(addr, config).await
}
