use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_lending::{config, db, server};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_lending=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    if config.reset_db {
        tracing::warn!("RESET_DB set, dropping all lending records");
        db::reset_db(&db).await.expect("Failed to reset database");
    }

    server::start_server(db, &config)
        .await
        .expect("Failed to start server");
}
