use std::process::ExitCode;

use tracing::error;

use kickback_client::tests::kickback_tests::{
    test_connection, test_event_state_advances, test_non_admin_rejected, test_payout_split,
    test_register_balance_change, test_sample_scenario, test_withdraw_once,
};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    println!("KickBack Contract Test Runner");
    println!("=============================\n");

    // Get command line arguments
    let args: Vec<String> = std::env::args().collect();
    let test_name = args.get(1).map(|s| s.as_str()).unwrap_or("all");

    match run(test_name).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(test_name: &str) -> Result<(), Box<dyn std::error::Error>> {
    match test_name {
        "connection" => test_connection().await?,
        "register" => test_register_balance_change().await?,
        "event_state" => test_event_state_advances().await?,
        "payout" => test_payout_split().await?,
        "withdraw_once" => test_withdraw_once().await?,
        "non_admin" => test_non_admin_rejected().await?,
        "scenario" => test_sample_scenario().await?,
        "all" => {
            println!("Running all tests...\n");

            println!("1. Connection test...");
            test_connection().await?;

            println!("\n2. Register balance change test...");
            test_register_balance_change().await?;

            println!("\n3. Event state test...");
            test_event_state_advances().await?;

            println!("\n4. Payout split test...");
            test_payout_split().await?;

            println!("\n5. Withdraw once test...");
            test_withdraw_once().await?;

            println!("\n6. Non-admin test...");
            test_non_admin_rejected().await?;

            println!("\n7. Scenario test...");
            test_sample_scenario().await?;

            println!("\nAll tests completed successfully!");
        }
        _ => {
            println!("Unknown test: {}", test_name);
            println!("Available tests:");
            println!("  connection - Deploy and list accounts and balances");
            println!("  register - Register costs exactly the deposit plus gas");
            println!("  event_state - eventState advances once per trigger");
            println!("  payout - Payout splits deposits over present attendees");
            println!("  withdraw_once - A second withdraw pays nothing");
            println!("  non_admin - startEvent from an attendee reverts");
            println!("  scenario - Full register/start/finalize/withdraw flow");
            println!("  all - Run every test");
            return Err(format!("unknown test: {}", test_name).into());
        }
    }
    Ok(())
}
