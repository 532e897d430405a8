use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::net::TcpListener;

use helpdesk_server::auth::TokenCodec;
use helpdesk_server::config::AppSettings;
use helpdesk_server::db::connection::{create_pool, init_schema, verify_connection};
use helpdesk_server::middleware::BearerAuthentication;
use helpdesk_server::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Load application settings
    let app_settings = AppSettings::from_env();

    // Database connection setup
    let db_pool = match create_pool(&app_settings.database.url).await {
        Ok(pool) => {
            if let Err(e) = verify_connection(&pool).await {
                log::error!("Database connection verification failed: {}", e);
                log::error!("Cannot start server without a working database connection");
                std::process::exit(1);
            }
            pool
        }
        Err(e) => {
            log::error!("Failed to create database connection pool: {}", e);
            log::error!("Cannot start server without a working database connection");
            std::process::exit(1);
        }
    };

    // Make sure the users and tickets tables exist
    if let Err(e) = init_schema(&db_pool).await {
        log::error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    // The token codec holds the process-wide secret, fixed for the process
    // lifetime; the gate middleware shares the same instance.
    let token_codec = TokenCodec::new(app_settings.auth.jwt_secret.clone());

    let host = app_settings.server.host.clone();
    let port = app_settings.server.port;
    log::info!("Starting server at http://{}:{}", host, port);

    let listener = TcpListener::bind(format!("{}:{}", host, port))?;

    HttpServer::new(move || {
        let db_pool = db_pool.clone();
        let token_codec = token_codec.clone();
        let auth = BearerAuthentication::new(token_codec.clone());

        // Allow the configured origin, plus the local dev frontends.
        let cors = Cors::default()
            .allowed_origin(&app_settings.server.cors_origin)
            .allowed_origin_fn(|origin, _| {
                origin.as_bytes().starts_with(b"http://localhost:5173")
                    || origin.as_bytes().starts_with(b"http://localhost:5174")
            })
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(db_pool))
            .app_data(web::Data::new(token_codec))
            .configure(routes::configure_public_routes)
            .configure(|cfg| routes::configure_protected_routes(cfg, &auth))
    })
    .listen(listener)?
    .run()
    .await
}
