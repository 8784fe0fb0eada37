use anyhow::Context;
use cloud_clients::{ObjectStoreClient, QueueClient};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use cloud_smoke::scenario;
use cloud_smoke::types::Environment;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();

    // Use JSON format for staging/production, regular format for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    info!("Starting cloud smoke checks in {:?} environment", environment);

    let config = environment.client_config()?;
    let store = ObjectStoreClient::new(&config).context("object store client")?;
    let queues = QueueClient::new(&config).context("queue client")?;

    if let Err(e) = scenario::run_object_store(&store, &Environment::smoke_bucket()).await {
        error!("Object store scenario failed: {:#}", e);
        return Err(e);
    }

    if let Err(e) = scenario::run_queue(&queues, &Environment::smoke_queue()).await {
        error!("Queue scenario failed: {:#}", e);
        return Err(e);
    }

    info!("All smoke checks passed");
    Ok(())
}
