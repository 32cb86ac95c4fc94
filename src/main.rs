use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use gigbid_backend::auth::middleware::JwtSecret;
use gigbid_backend::cache::{CacheConfig, RedisCache};
use gigbid_backend::create_pool;
use gigbid_backend::handlers;
use gigbid_backend::notify::server::NotificationServer;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let db = create_pool().await;
    let db_data = web::Data::new(db);

    // Initialize Redis cache
    let redis_url = std::env::var("REDIS_URL").expect("REDIS_URL must be set");
    let redis_cache = RedisCache::new(&redis_url)
        .await
        .expect("Failed to connect to Redis");
    let redis_data = web::Data::new(Arc::new(redis_cache));
    let cache_config = web::Data::new(CacheConfig::from_env());
    tracing::info!("Connected to Redis");

    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let jwt_data = web::Data::new(JwtSecret(jwt_secret));

    // Create the shared notification server (connection registry for
    // realtime hired events).
    let notification_server = web::Data::new(Arc::new(NotificationServer::new()));

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{port}");
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(cache_config.clone())
            .app_data(jwt_data.clone())
            .app_data(notification_server.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
