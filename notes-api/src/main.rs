use std::sync::Arc;

use tracing::{info, warn};

use notes_api::auth::JwtVerifier;
use notes_api::metrics::Metrics;
use notes_api::summarizer::Summarizer;
use notes_api::{api, config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = config::Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level))
        )
        .json()
        .init();

    info!("Starting notes API");

    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; openai summaries will fail");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; gemini summaries will fail");
    }

    // Initialize database pool
    let db_pool = db::create_pool(&config.database_url).await?;
    info!("Database connection pool created");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;
    info!("Database migrations applied");

    let store = Arc::new(db::PgNoteStore::new(db_pool));
    let verifier = JwtVerifier::new(&config.jwt_secret);
    let summarizer = Arc::new(Summarizer::from_config(&config));
    let metrics = Metrics::new()?;

    let routes = api::service(store, verifier, summarizer, metrics);

    // Start server
    let addr = ([0, 0, 0, 0], config.port);
    info!("Server listening on {}", config.port);

    warp::serve(routes)
        .run(addr)
        .await;

    Ok(())
}
