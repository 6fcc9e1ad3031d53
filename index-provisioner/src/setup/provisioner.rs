use crate::core::client::database::DatabaseClient;
use crate::setup::report::{IndexStatus, IndexVerification, VerificationReport};
use crate::types::index::{group_by_collection, index_manifest, CollectionPlan, IndexSpec};
use crate::ProvisionerResult;
use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};

/// Index names reported by the server for one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub collection: &'static str,
    pub index_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    pub collections: Vec<CollectionSummary>,
}

impl ProvisionSummary {
    pub fn index_count(&self) -> usize {
        self.collections.iter().map(|summary| summary.index_names.len()).sum()
    }
}

/// Creates and checks the indexes of a manifest through a [`DatabaseClient`].
pub struct IndexProvisioner {
    client: Arc<dyn DatabaseClient>,
    manifest: Vec<IndexSpec>,
}

impl IndexProvisioner {
    pub fn new(client: Arc<dyn DatabaseClient>) -> Self {
        Self::with_manifest(client, index_manifest())
    }

    pub fn with_manifest(client: Arc<dyn DatabaseClient>, manifest: Vec<IndexSpec>) -> Self {
        Self { client, manifest }
    }

    pub fn plan(&self) -> Vec<CollectionPlan> {
        group_by_collection(&self.manifest)
    }

    /// Issues one `createIndexes` per collection. The first failure is returned as is,
    /// collections already processed keep their indexes.
    pub async fn provision(&self) -> ProvisionerResult<ProvisionSummary> {
        let mut summary = ProvisionSummary::default();

        for plan in self.plan() {
            let span = info_span!("provision", collection = %plan.collection);
            let index_names = async {
                for spec in &plan.indexes {
                    info!(
                        index = %spec.name(),
                        unique = spec.unique,
                        expire_after_secs = spec.expire_after.map(|d| d.as_secs()),
                        "Ensuring index"
                    );
                }
                let index_names = self.client.create_indexes(plan.collection, plan.index_models()).await?;
                debug!(count = index_names.len(), "Indexes in place");
                ProvisionerResult::Ok(index_names)
            }
            .instrument(span)
            .await?;

            summary.collections.push(CollectionSummary { collection: plan.collection, index_names });
        }

        Ok(summary)
    }

    /// Compares the manifest with the live index catalog. Reads only, never creates anything.
    pub async fn verify(&self) -> ProvisionerResult<VerificationReport> {
        let mut entries = Vec::with_capacity(self.manifest.len());

        for plan in self.plan() {
            let existing = self
                .client
                .list_indexes(plan.collection)
                .instrument(info_span!("verify", collection = %plan.collection))
                .await?;

            for spec in plan.indexes {
                let status = match existing.iter().find(|entry| spec.matches_keys(&entry.keys)) {
                    None => IndexStatus::Missing,
                    Some(entry) if entry.unique == spec.unique && entry.expire_after == spec.expire_after => {
                        IndexStatus::Present
                    }
                    Some(entry) => IndexStatus::Mismatched { unique: entry.unique, expire_after: entry.expire_after },
                };
                debug!(collection = %spec.collection, index = %spec.name(), status = ?status, "Checked index");
                entries.push(IndexVerification { spec, status });
            }
        }

        Ok(VerificationReport { entries })
    }
}
