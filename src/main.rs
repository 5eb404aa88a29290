use log::{error, info};
use room_poll::config::Config;
use room_poll::snapshot::{self, Snapshot};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    info!("Loading poll snapshot from {}", config.snapshot_path.display());

    let snapshot = Snapshot::load(&config.snapshot_path)?;
    let views = snapshot::evaluate(snapshot, config.poll_id.as_deref(), config.evaluation_time()).await?;

    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}
