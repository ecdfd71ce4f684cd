use color_eyre::eyre::Result;
use dotenv::dotenv;
use parish_api::config::ApiConfig;
use parish_db::{create_pool, schema::initialize_database};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Creates or upgrades the schema without starting the server.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenv().ok();
    let config = ApiConfig::from_env()?;

    info!("Connecting to database");
    let db_pool = create_pool(&config.database_url, 1).await?;

    initialize_database(&db_pool).await?;
    info!("Database schema initialized");

    Ok(())
}
