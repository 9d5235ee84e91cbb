use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;

use greenthumb::core::SystemClock;
use greenthumb::{api, AppState, Config, Database};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting GreenThumb journal server...");

    let db = Database::open(&config.database_path)?;
    info!("Database schema verified ({})", config.database_path);

    if config.plant_id_api_key.is_none() {
        info!("PLANT_ID_API_KEY not set - identification proxy disabled");
    }
    if config.trefle_api_key.is_none() {
        info!("TREFLE_API_KEY not set - supplemental details proxy disabled");
    }

    let state = AppState::new(db, Arc::new(SystemClock), &config);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server is running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
