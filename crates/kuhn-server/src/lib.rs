//! Match-coordination server.
//!
//! Exposes session creation and the `/play` WebSocket bridge over
//! actix-web, backed by a [`kuhn_coordinator::Registry`].

mod card_image;
pub mod handlers;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use kuhn_coordinator::Registry;
use kuhn_core::Config;

async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[rustfmt::skip]
pub async fn run() -> std::io::Result<()> {
    let config = Config::from_env();
    let db = if config.db_url.is_empty() {
        None
    } else {
        Some(kuhn_database::connect(&config.db_url).await)
    };
    let registry = web::Data::new(Registry::new(config.clone(), db.clone()));
    let config_data = web::Data::new(config.clone());
    log::info!("starting kuhn-poker coordination server on {}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(registry.clone())
            .app_data(config_data.clone())
            .route("/health", web::get().to(health))
            .service(
                web::scope("/session")
                    .route("", web::post().to(handlers::start)),
            )
            .route("/play/{session_id}", web::get().to(handlers::enter))
    })
    .workers(6)
    .bind(&config.bind_addr)?
    .run()
    .await
}
