pub mod constant;
pub mod error;
pub mod mongodb;

use crate::types::index::CatalogIndex;
use ::mongodb::IndexModel;
use async_trait::async_trait;
pub use error::DatabaseError;

/// Trait defining the index catalog operations the provisioner relies on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// health_check - Ping the target database
    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// create_indexes - Create indexes on a collection, returning the index names.
    /// Indexes that already exist with an identical definition are left as they are.
    async fn create_indexes(&self, collection: &str, indexes: Vec<IndexModel>) -> Result<Vec<String>, DatabaseError>;

    /// list_indexes - List the index catalog of a collection.
    /// A collection that does not exist yet has no indexes.
    async fn list_indexes(&self, collection: &str) -> Result<Vec<CatalogIndex>, DatabaseError>;
}
