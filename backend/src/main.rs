//! Backend entry-point: wires the directory REST endpoints and OpenAPI docs.

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::auth::ApiKeyPolicy;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, migrations};
use backend::server::{ServerConfig, build_server, build_store};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let bind_addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid listen address: {e}")))?;

    let api_key_enabled = env::var("API_KEY_ENABLED").is_ok_and(|value| value == "true");
    let api_key_policy = ApiKeyPolicy::resolve(api_key_enabled, env::var("API_KEY").ok());
    if api_key_enabled && api_key_policy == ApiKeyPolicy::disabled() {
        warn!("API_KEY_ENABLED is set but API_KEY is missing; requests will not be authenticated");
    } else if !api_key_enabled {
        warn!("API_KEY_ENABLED is not set; requests will not be authenticated");
    }

    let db_pool = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            if let Err(e) = migrations::run_pending(&database_url).await {
                error!(error = %e, "database migration failed");
                return Err(std::io::Error::other(format!("migration failed: {e}")));
            }
            let pool = DbPool::new(PoolConfig::new(database_url))
                .await
                .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
            Some(pool)
        }
        Err(_) => {
            warn!("DATABASE_URL is not set; falling back to the in-memory store");
            None
        }
    };

    let store = build_store(db_pool);

    #[cfg(feature = "example-data")]
    {
        use std::ffi::OsString;

        use backend::seeding::{ExampleOrgSettings, seed_example_org_on_startup};
        use ortho_config::OrthoConfig;

        match ExampleOrgSettings::load_from_iter([OsString::from("backend")]) {
            Ok(settings) => {
                if let Err(e) = seed_example_org_on_startup(&settings, store.as_ref()).await {
                    error!(error = %e, "example organization seeding failed");
                }
            }
            Err(e) => warn!(error = %e, "example organization settings failed to load"),
        }
    }

    let config = ServerConfig::new(bind_addr).with_api_key_policy(api_key_policy);
    let health_state = web::Data::new(HealthState::new());
    let server = build_server(config, store, health_state.clone())?;

    health_state.mark_ready();
    server.await
}
