mod config;
mod error;
mod gemini;
mod image;
mod routes;
mod sanitize;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use config::AppConfig;
use gemini::{GeminiClient, SmileService};
use routes::{configure_routes, json_config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Startup aborted: {e}");
        std::io::Error::other(e.to_string())
    })?;
    log::info!("Using Gemini model: {}", config.model);

    let client = GeminiClient::new(&config);
    let service = web::Data::new(SmileService::new(Arc::new(client)));

    log::info!("Starting server on 0.0.0.0:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(service.clone())
            .app_data(json_config())
            .configure(configure_routes)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
