use std::env;

/// Process-wide configuration, loaded once at startup and never mutated
/// afterwards.
#[derive(Clone, Debug)]
pub struct AppSettings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Fallback signing secret for local development only.
const DEV_JWT_SECRET: &str = "LOCAL_DEV_SECRET";

impl AppSettings {
    pub fn from_env() -> Self {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET not set, falling back to the local development secret");
            DEV_JWT_SECRET.to_string()
        });

        // DATABASE_URL wins; otherwise the URL is assembled from the PG_*
        // variables the ops scripts export.
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            let pg_host = env::var("PG_HOST").unwrap_or_else(|_| "localhost".to_string());
            let pg_port = env::var("PG_PORT").unwrap_or_else(|_| "5432".to_string());
            let pg_db = env::var("PG_DB").unwrap_or_else(|_| "hospital".to_string());
            let pg_user = env::var("PG_USER").unwrap_or_else(|_| "postgres".to_string());
            let pg_password = env::var("PG_PASSWORD").unwrap_or_default();
            if pg_password.is_empty() {
                format!("postgres://{}@{}:{}/{}", pg_user, pg_host, pg_port, pg_db)
            } else {
                format!(
                    "postgres://{}:{}@{}:{}/{}",
                    pg_user, pg_password, pg_host, pg_port, pg_db
                )
            }
        });

        Self {
            server: ServerConfig {
                host,
                port,
                cors_origin,
            },
            database: DatabaseConfig { url: database_url },
            auth: AuthConfig { jwt_secret },
        }
    }
}
