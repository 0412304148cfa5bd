use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geekybot_api::{config::Config, db, routes, services::chat::ChatService, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let config = Arc::new(config);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let redis_client = redis::Client::open(config.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;
    info!("Redis connected");

    let chat = Arc::new(ChatService::new(config.chat_webhook_url.clone()));

    let state = AppState {
        db: pool,
        redis: redis_conn,
        config: config.clone(),
        chat,
    };

    // The admin panel and the chat page are served from other origins, so the
    // API stays fully permissive (the original surface advertised `*`).
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static("x-admin-key"),
            header::HeaderName::from_static("x-session-id"),
        ]))
        .allow_origin(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Welcome message
        .route(
            "/api/mensaje_bienvenida",
            get(routes::welcome_message::get_welcome_message)
                .put(routes::welcome_message::update_welcome_message)
                .options(routes::preflight),
        )
        // Advertisements
        .route(
            "/api/anuncios/activos",
            get(routes::ads::list_active_ads).options(routes::preflight),
        )
        .route(
            "/api/anuncios",
            get(routes::ads::list_ads)
                .post(routes::ads::create_ad)
                .options(routes::preflight),
        )
        .route(
            "/api/anuncios/imagen",
            post(routes::images::upload_ad_image).options(routes::preflight),
        )
        .route(
            "/api/anuncios/{id}",
            put(routes::ads::update_ad)
                .delete(routes::ads::delete_ad)
                .options(routes::preflight),
        )
        .route(
            "/api/imagenes/{name}",
            get(routes::images::serve_image).options(routes::preflight),
        )
        // Site settings
        .route(
            "/api/configuracion",
            get(routes::site_settings::get_site_settings)
                .put(routes::site_settings::update_site_settings)
                .options(routes::preflight),
        )
        // Chat relay
        .route(
            "/api/chat",
            post(routes::chat::send_message).options(routes::preflight),
        )
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Ad images are small; 10 MB is plenty
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("GeekyBot API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
