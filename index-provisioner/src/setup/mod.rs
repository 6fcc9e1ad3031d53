use crate::cli::{SetupCmd, VerifyCmd};
use crate::core::client::{DatabaseClient, MongoDbClient};
use crate::types::index::{group_by_collection, index_manifest};
use crate::types::params::DatabaseArgs;
use crate::{ProvisionerError, ProvisionerResult};
use std::sync::Arc;
use tracing::{info, warn};

pub mod provisioner;
pub mod report;

pub use provisioner::{IndexProvisioner, ProvisionSummary};
pub use report::{IndexStatus, VerificationReport};

/// Setup function that creates every index of the manifest
pub async fn setup(setup_cmd: &SetupCmd) -> ProvisionerResult<()> {
    let database_args = DatabaseArgs::try_from(setup_cmd.mongodb_args.clone())?;

    if setup_cmd.dry_run {
        info!(database = %database_args.database_name, "Dry run, no index will be created");
        for plan in group_by_collection(&index_manifest()) {
            for spec in &plan.indexes {
                info!(collection = %plan.collection, "Would ensure index {}", spec);
            }
        }
        return Ok(());
    }

    let client = connect(&database_args).await?;
    info!(database = %database_args.database_name, "Setting up indexes...");

    let summary = IndexProvisioner::new(client).provision().await?;
    info!(
        collections = summary.collections.len(),
        indexes = summary.index_count(),
        "Indexes are in place"
    );
    Ok(())
}

/// Checks the live index catalog against the manifest, failing when anything is missing or mismatched
pub async fn verify(verify_cmd: &VerifyCmd) -> ProvisionerResult<VerificationReport> {
    let database_args = DatabaseArgs::try_from(verify_cmd.mongodb_args.clone())?;
    let client = connect(&database_args).await?;

    let report = IndexProvisioner::new(client).verify().await?;
    for entry in report.problems() {
        warn!(collection = %entry.spec.collection, index = %entry.spec.name(), status = ?entry.status, "Index not in place");
    }
    if !report.is_satisfied() {
        return Err(ProvisionerError::VerificationFailed(report.to_string()));
    }

    info!(database = %database_args.database_name, "{}", report);
    Ok(report)
}

/// Builds the MongoDB client and pings the server so an unreachable database fails before any index work
pub async fn connect(database_args: &DatabaseArgs) -> ProvisionerResult<Arc<dyn DatabaseClient>> {
    let client = MongoDbClient::new(database_args).await?;
    client.health_check().await?;
    info!(database = %database_args.database_name, "Connected to MongoDB");
    Ok(Arc::new(client))
}
