use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use restaurant_api::{build_state, create_router, infrastructure::logger::Logger, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {}", e);
        }
    }

    let config = Config::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    Logger::init(&config.logging);
    info!("Starting restaurant API server...");

    let state = build_state(&config).await?;
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("invalid bind address")?;
    let listener = TcpListener::bind(addr).await?;

    info!("🚀 Restaurant management server is running on http://{}", addr);
    info!("   POST   /jwt  /logout");
    info!("   GET    /foods?page&size  /foods/:id  /foods/user/:email  /count/foods  /top/foods");
    info!("   POST   /foods   PATCH/DELETE /foods/:id        (auth)");
    info!("   GET    /orders?email  POST /orders  DELETE /orders/:id  (auth)");

    axum::serve(listener, app).await?;

    Ok(())
}
