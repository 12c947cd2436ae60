use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

use kickback_client::{ClientConfig, ContractError, KickBackService};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenv().ok();

    // Initialize logging; stdout is kept for the report
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ContractError> {
    let config = ClientConfig::from_env()?;
    info!(chain = %config.chain.name, chain_id = config.chain.chain_id, "running KickBack demo");

    let service = KickBackService::new(config).await?;
    service
        .run_scenario_with(|label, value| println!("{}: {}", label, value))
        .await?;

    Ok(())
}
