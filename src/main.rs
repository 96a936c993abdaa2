use anyhow::{Context, Result};
use dotenvy::dotenv;

mod components;
mod config;
mod controllers;
mod detail_view;
mod errors;
mod extractors;
mod htmx;
mod list_view;
mod logging;
mod models;
mod repo;
mod routes;
mod store;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    logging::init()?;

    let config = config::Config::from_env()?;
    let blobs = store::FileBlobStore::open(config.data_dir.clone())
        .with_context(|| {
            format!("cannot open data dir {}", config.data_dir.display())
        })?;
    let notes = store::NoteStore::new(Box::new(blobs), config.storage_key.clone())?;
    let state = models::AppState::new(
        repo::NoteRepository::init(notes),
        config.assets_dir.clone(),
    );
    let app = routes::app(state);

    tracing::info!(
        addr = %config.addr,
        data_dir = %config.data_dir.display(),
        "listening"
    );
    axum::Server::bind(&config.addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
