//! HTTP server bootstrap shared by every backend.

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use rollcall_core::{backend::StoreBackend, store::DocumentStore};
use tracing::info;

use crate::{
    config::Config,
    http::{self, RequestTrace},
    service::StudentService,
};

/// Serves the student API on `config.bind` until the process is signalled.
///
/// The backend is created once by the caller and shared by every worker. Indexes are ensured
/// before the listener opens, and the backend is shut down after the server stops.
pub async fn serve<B>(config: &Config, backend: B) -> anyhow::Result<()>
where
    B: StoreBackend + Clone + 'static,
{
    let service = StudentService::new(DocumentStore::new(backend), config.storage_timeout());
    service
        .ensure_indexes()
        .await
        .context("failed to create student indexes")?;

    let data = web::Data::new(service);
    let server_data = data.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_data.clone())
            .wrap(RequestTrace)
            .configure(http::configure::<B>)
    })
    .bind(config.bind.as_str())
    .with_context(|| format!("failed to bind {}", config.bind))?;

    info!(bind = %config.bind, backend = ?config.backend, "listening");
    server.run().await.context("HTTP server failed")?;
    info!("server stopped");

    data.store()
        .clone()
        .shutdown()
        .await
        .context("failed to shut down storage backend")
}
