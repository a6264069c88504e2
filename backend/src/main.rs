mod cli;
mod config;
mod forensics;
mod inference;
mod metrics;
mod pipeline;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use clap::Parser;
use cli::{Cli, Command};
use config::AppConfig;
use inference::ModelState;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();
    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Classify { image, ela_out } => cli::classify(&config, &image, ela_out.as_deref()),
    }
}

async fn serve(config: AppConfig) -> std::io::Result<()> {
    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    log::info!("Loading model from {}", config.model_path.display());
    let model = ModelState::load(&config);
    match &model {
        ModelState::Ready(_) => log::info!("Model loaded successfully"),
        ModelState::Unavailable(reason) => {
            log::error!("Error loading model: {}; /predict will fail", reason)
        }
        ModelState::NotLoaded => log::warn!("Model not loaded"),
    }

    let model = web::Data::new(model);
    let app_config = web::Data::new(config.clone());
    let bind_address = config.bind_address();

    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(model.clone())
            .app_data(app_config.clone())
            .configure(|cfg| configure_routes(cfg, &app_config))
    })
    .bind(&bind_address)?
    .run()
    .await
}
