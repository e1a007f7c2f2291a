//! # SpotBot Binary
//!
//! The entry point that assembles the engine from the enabled plugins and
//! serves the inbound event endpoint.

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use sb_core::ChatEvent;
use sb_engine::Engine;
use std::sync::Arc;

// Feature-gated imports: swap plugins without touching the engine
#[cfg(feature = "db-sqlite")]
use sb_db_sqlite::SqliteSpotRepo;

#[cfg(feature = "storage-local")]
use sb_storage_local::LocalMediaStore;

#[cfg(feature = "chat-http")]
use sb_chat_http::HttpChatClient;

mod config;
use config::Config;

/// One inbound event per request. Always 200: a bad event is logged and
/// answered in-channel, never allowed to crash or re-deliver forever.
async fn events(engine: web::Data<Engine>, event: web::Json<ChatEvent>) -> impl Responder {
    if let Err(err) = engine.handle(event.into_inner()).await {
        log::error!("event handling failed: {err:#}");
    }
    HttpResponse::Ok().finish()
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load()?;

    // 1. Persistence
    #[cfg(feature = "db-sqlite")]
    let repo = Arc::new(SqliteSpotRepo::new(&config.database_url).await?);

    // 2. Photo storage
    #[cfg(feature = "storage-local")]
    let media = Arc::new(LocalMediaStore::new(
        config.storage_root.clone().into(),
        config.storage_url_prefix.clone(),
        Some(config.chat_token.clone()),
    )?);

    // 3. Outbound messaging
    #[cfg(feature = "chat-http")]
    let chat = Arc::new(HttpChatClient::new(
        config.chat_api_base.clone(),
        config.chat_token.clone(),
    )?);

    let engine = web::Data::new(Engine::new(repo, media, chat, config.semester.clone()));

    log::info!("spotbot starting on port {} for semester {}", config.port, config.semester);

    HttpServer::new(move || {
        App::new()
            .app_data(engine.clone())
            .route("/events", web::post().to(events))
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;
    Ok(())
}
