use anyhow::Context;
use clap::Parser;
use rollcall::{
    config::{BackendKind, Config},
    memory::InMemoryStore,
    mongodb::MongoDbStore,
    server, telemetry,
};
use rollcall_core::backend::StoreBackendBuilder;
use tracing::warn;

const APP_NAME: &str = "rollcall";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    telemetry::init(config.log_json)?;

    match config.backend {
        BackendKind::Memory => {
            warn!("using the in-memory backend; records are lost on exit");
            let backend = InMemoryStore::builder().build().await?;
            server::serve(&config, backend).await
        }
        BackendKind::Mongodb => {
            let settings = config.mongodb_settings()?;
            let backend = MongoDbStore::builder(settings.uri, settings.database)
                .app_name(APP_NAME)
                .build()
                .await
                .context("failed to connect to MongoDB")?;
            server::serve(&config, backend).await
        }
    }
}
