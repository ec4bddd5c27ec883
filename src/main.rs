use color_eyre::eyre::Result;
use dotenv::dotenv;
use eventsched_api::config::ApiConfig;
use eventsched_db::{create_pool, schema::initialize_database};
use eyre::WrapErr;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing before the schema setup logs anything
    eventsched_api::init_tracing(config.log_level)?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .wrap_err("failed to connect to the database")?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Start API server
    eventsched_api::start_server(config, db_pool).await?;

    Ok(())
}
