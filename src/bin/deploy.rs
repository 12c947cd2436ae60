use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

use kickback_client::application::services::{DEPLOY_DEPOSIT, DEPLOY_LIMIT_ATTENDEES};
use kickback_client::{ClientConfig, ContractError, KickBackService, Role};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

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
    let service = KickBackService::new(config).await?;

    let deployer = service.accounts().address(Role::Owner)?;
    println!("Deploying contracts with the account: {:?}", deployer);

    let deposit = service.amount(DEPLOY_DEPOSIT)?;
    info!(deposit = %service.format(deposit), limit_attendees = DEPLOY_LIMIT_ATTENDEES, "deploying KickBack");
    let kickback = service.deploy(deposit, DEPLOY_LIMIT_ATTENDEES).await?;

    println!("KickBack deployed to: {}", kickback.handle());
    Ok(())
}
