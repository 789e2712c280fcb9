use anyhow::Result;
use aws_config::BehaviorVersion;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use media_vault::{
    config::AppConfig,
    jwt::TokenService,
    routes,
    state::AppState,
    store::{postgres::PgDocumentStore, s3::S3BlobStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting media-vault service");

    let config = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    info!("Database connection successful");

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_client = aws_sdk_s3::Client::new(&aws_config);

    let state = AppState {
        documents: Arc::new(PgDocumentStore::new(pool)),
        blobs: Arc::new(S3BlobStore::new(
            s3_client,
            config.bucket.clone(),
            config.public_url.clone(),
        )),
        tokens: TokenService::new(&config.jwt_secret, config.jwt_expiry_secs),
        max_upload_bytes: config.max_upload_bytes,
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("media-vault listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
