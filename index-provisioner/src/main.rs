use clap::Parser as _;
use dotenvy::dotenv;
use index_provisioner::cli::{Cli, Commands};
use index_provisioner::setup::{setup, verify};
use index_provisioner::utils::logging::init_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Setup { setup_command } => {
            info!(dry_run = setup_command.dry_run, "Executing setup command");
            match setup(setup_command).await {
                Ok(_) => {
                    info!("Index setup completed successfully");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(
                        error = %e,
                        error_chain = ?e,
                        "Failed to set up indexes"
                    );
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Verify { verify_command } => {
            info!("Executing verify command");
            match verify(verify_command).await {
                Ok(_) => {
                    info!("All indexes are in place");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(
                        error = %e,
                        error_chain = ?e,
                        "Index verification failed"
                    );
                    ExitCode::FAILURE
                }
            }
        }
    }
}
