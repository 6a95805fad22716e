use std::io;
use std::sync::Arc;

use dotenvy::dotenv;
use shop_service::application::LogMailer;
use shop_service::config::AppConfig;
use shop_service::infrastructure::{InMemoryStore, PgStore, ShopStore};
use shop_service::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let store = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.db_pool_size).map_err(io::Error::other)?;
            if config.run_migrations {
                run_migrations(&pool).map_err(io::Error::other)?;
            }
            ShopStore::Postgres(PgStore::new(pool))
        }
        None => {
            log::warn!("DATABASE_URL is not set; data is kept in memory and lost on exit");
            ShopStore::Memory(InMemoryStore::new())
        }
    };

    let state = AppState::new(store, Arc::new(LogMailer))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
