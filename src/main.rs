use std::sync::Arc;

use abraje::{
    config::{self, Config},
    logger::setup_logger,
    store::{pg::PgListingStore, ListingStore},
    web::{self, AppState},
};
use anyhow::Result;
use log::{error, info};
use tokio::{signal, sync::broadcast};

#[tokio::main]
async fn main() -> Result<()> {
    let config: Arc<Config> = Arc::new(config::read_config()?);

    // Initialize logger
    setup_logger(config.log_level.as_deref())?;

    let store: Arc<dyn ListingStore> = Arc::new(PgListingStore::from_config(&config)?);
    let state = AppState {
        config: config.clone(),
        store,
    };

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => error!("Failed to listen for Ctrl+C: {:?}", err),
        }
        let _ = shutdown_tx.send(());
    });

    if let Err(err) = web::start_http_server(state, shutdown_rx).await {
        error!("Error: {:?}", err);
        return Err(err);
    }

    Ok(())
}
