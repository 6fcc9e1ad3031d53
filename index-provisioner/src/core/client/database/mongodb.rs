use super::constant::NAMESPACE_NOT_FOUND_CODE;
use super::error::{server_error_code, DatabaseError};
use super::DatabaseClient;
use crate::types::index::CatalogIndex;
use crate::types::params::database::DatabaseArgs;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::ClientOptions;
use mongodb::{bson, Client, Collection, Database, IndexModel};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

const APP_NAME: &str = "index-provisioner";

pub trait ToDocument {
    fn to_document(&self) -> Result<Document, DatabaseError>;
}

impl<T: Serialize> ToDocument for T {
    fn to_document(&self) -> Result<Document, DatabaseError> {
        let doc = bson::to_bson(self).map_err(|e| DatabaseError::FailedToSerializeDocument(e.to_string()))?;

        if let Bson::Document(doc) = doc {
            Ok(doc)
        } else {
            Err(DatabaseError::FailedToSerializeDocument(format!("Failed to serialize document: {}", doc)))
        }
    }
}

/// MongoDB client implementation
pub struct MongoDbClient {
    database: Arc<Database>,
}

impl MongoDbClient {
    /// Builds the client. The driver connects lazily, so an unreachable server only
    /// shows up on the first command; call [`DatabaseClient::health_check`] to surface it early.
    pub async fn new(config: &DatabaseArgs) -> Result<Self, DatabaseError> {
        let mut options = ClientOptions::parse(&config.connection_uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);

        let client = Client::with_options(options)?;
        let database = Arc::new(client.database(&config.database_name));
        Ok(Self { database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn get_collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    /// insert_one - Insert a single document, mapping unique index violations to `DuplicateKey`
    pub async fn insert_one<T>(&self, collection: &str, document: &T) -> Result<(), DatabaseError>
    where
        T: Serialize + Send + Sync,
    {
        let document = document.to_document()?;
        self.get_collection::<Document>(collection).insert_one(document).await.map_err(DatabaseError::classify)?;
        Ok(())
    }

    /// count_documents - Count the documents of a collection matching `filter`
    pub async fn count_documents(&self, collection: &str, filter: Document) -> Result<u64, DatabaseError> {
        Ok(self.get_collection::<Document>(collection).count_documents(filter).await?)
    }
}

#[async_trait]
impl DatabaseClient for MongoDbClient {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn create_indexes(&self, collection: &str, indexes: Vec<IndexModel>) -> Result<Vec<String>, DatabaseError> {
        let start = Instant::now();
        let result = self
            .get_collection::<Document>(collection)
            .create_indexes(indexes)
            .await
            .map_err(DatabaseError::classify)?;
        debug!(
            collection = %collection,
            duration_ms = start.elapsed().as_millis() as u64,
            "createIndexes completed"
        );
        Ok(result.index_names)
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<CatalogIndex>, DatabaseError> {
        let cursor = match self.get_collection::<Document>(collection).list_indexes().await {
            Ok(cursor) => cursor,
            Err(err) if server_error_code(&err) == Some(NAMESPACE_NOT_FOUND_CODE) => {
                debug!(collection = %collection, "Collection does not exist yet, no indexes to list");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        // raw documents, the typed options drop entries whose numbers are doubles
        let documents: Vec<Document> = cursor.with_type::<Document>().try_collect().await?;
        documents.iter().map(CatalogIndex::from_document).collect()
    }
}
