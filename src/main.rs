use book_store::{
    config::{catalog, database},
    core::{listing, query::BookQuery, seed},
    errors::Result,
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the seed configuration
    let config = catalog::load_default_config()
        .inspect_err(|e| error!("Failed to load seed configuration: {}", e))?;

    // 4. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed users and books
    seed::seed_catalog(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Print the annotated catalog, filtered by `key=value` arguments
    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = BookQuery::from_params(args.iter().filter_map(|arg| arg.split_once('=')))?;
    let books = listing::list_books(&db, &query).await?;
    info!("Listing {} books.", books.len());
    println!("{}", serde_json::to_string_pretty(&books)?);

    Ok(())
}
