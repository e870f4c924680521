use actix_cors::Cors;
use actix_web::{self, http::header, middleware::Logger, web, App, HttpServer};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::{
    configs::{media_config, prepare_storage},
    modules::media::{MediaFsRepository, MediaService},
};

mod api;
mod configs;
mod constants;
mod modules;
#[cfg(test)]
mod test;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = media_config(&ENV);
    prepare_storage(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("Media storage error: {e}")))?;

    let media_service = web::Data::new(MediaService::new(Arc::new(MediaFsRepository::new(config))));

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![header::RANGE, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_RANGE, header::ACCEPT_RANGES, header::CONTENT_LENGTH])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(media_service.clone())
            .service(health_check)
            .configure(modules::media::route::configure::<MediaFsRepository>)
    })
    .keep_alive(Duration::from_secs(ENV.keep_alive_secs))
    .client_request_timeout(Duration::from_secs(ENV.client_request_timeout_secs))
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(ENV.workers)
    .run()
    .await
}
