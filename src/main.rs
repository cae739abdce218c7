use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use infra::config::AppConfig;
use infra::repository::in_memory::album::InMemoryAlbumRepository;
use log::info;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // log to console and file at the same time
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}",
        )))
        .build("app.log")
        .unwrap();

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build(
            "stdout",
            Box::new(log4rs::append::console::ConsoleAppender::builder().build()),
        ))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(log_level.parse().unwrap_or(log::LevelFilter::Info)),
        )
        .unwrap();

    log4rs::init_config(config).unwrap();
    let cfg = AppConfig::load().unwrap();
    let server_cfg = cfg.server();

    let albums = Arc::new(InMemoryAlbumRepository::with_demo_catalog());
    let app_state = web::Data::new(server::AppState::new(albums));

    info!(
        "Albums API server running on {}:{}",
        server_cfg.host, server_cfg.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .route("/", web::get().to(server::index))
            .configure(server::albums::configure_service)
            .default_service(web::route().to(server::not_found))
            .wrap(server::middleware::cors())
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await
}
