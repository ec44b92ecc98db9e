mod config;
mod engine;
mod error;
mod services;
mod state;
mod store;

use crate::config::ReliefConfig;
use crate::state::AppState;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let config = ReliefConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    env_logger::init_from_env(Env::default().default_filter_or(config.logging.level.as_str()));

    let state = AppState::from_config(&config).map_err(|e| {
        error!("Failed to initialise storage: {e}");
        io::Error::other(e.to_string())
    })?;
    let state = web::Data::new(state);

    let (host, port) = config.bind_addr();
    let json_limit = config.server.json_limit;
    info!("Server running at http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(services::api(json_limit))
    })
    .bind((host, port))?
    .run()
    .await
}
