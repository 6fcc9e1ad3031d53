//! Index definitions provisioned on the action service database.
//!
//! | Collection             | Keys                                                       | Options            |
//! |------------------------|------------------------------------------------------------|--------------------|
//! | `active_actions`       | `server_number`, `action_type`, `selected_bots`, `delay`   | unique             |
//! | `active_actions`       | `server_number`                                            |                    |
//! | `active_actions`       | `action_type`                                              |                    |
//! | `completed_operations` | `created_at`                                               | expire after 1 day |
//! | `completed_operations` | `operation_id`                                             | unique             |
//! | `cache_version`        | `key`                                                      | unique             |
//!
//! All keys are ascending.

use crate::core::client::database::constant::{
    ACTIVE_ACTIONS_COLLECTION, CACHE_VERSION_COLLECTION, COMPLETED_OPERATIONS_COLLECTION,
    COMPLETED_OPERATIONS_TTL_SECS,
};
use crate::core::client::database::DatabaseError;
use mongodb::bson::{Bson, Document};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Reads a key direction from a catalog entry. Shells write numbers as doubles,
    /// so any numeric type is accepted. Special index types (`"text"`, `"2dsphere"`, ...) yield `None`.
    pub fn from_bson(value: &Bson) -> Option<Self> {
        let direction = numeric(value)?;
        if direction > 0.0 {
            Some(SortOrder::Ascending)
        } else if direction < 0.0 {
            Some(SortOrder::Descending)
        } else {
            None
        }
    }
}

fn numeric(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// One entry of a collection's index catalog, as returned by `listIndexes`.
///
/// Read from the raw document rather than through the driver's typed options:
/// catalogs written by a shell hold `expireAfterSeconds` (and sometimes `unique`)
/// as doubles, which the typed options do not accept.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogIndex {
    pub name: Option<String>,
    pub keys: Document,
    pub unique: bool,
    pub expire_after: Option<Duration>,
}

impl CatalogIndex {
    pub fn from_document(document: &Document) -> Result<Self, DatabaseError> {
        let keys = document
            .get_document("key")
            .map_err(|e| DatabaseError::InvalidCatalogEntry(format!("index without a key pattern: {}", e)))?
            .clone();
        let name = document.get_str("name").ok().map(str::to_string);
        let unique = match document.get("unique") {
            Some(Bson::Boolean(unique)) => *unique,
            Some(value) => numeric(value).is_some_and(|v| v != 0.0),
            None => false,
        };
        let expire_after = match document.get("expireAfterSeconds") {
            None => None,
            Some(value) => Some(
                numeric(value)
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                    .ok_or_else(|| {
                        DatabaseError::InvalidCatalogEntry(format!("unreadable expireAfterSeconds: {}", value))
                    })?,
            ),
        };
        Ok(Self { name, keys, unique, expire_after })
    }
}

/// A single index of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub keys: Vec<(&'static str, SortOrder)>,
    pub unique: bool,
    pub expire_after: Option<Duration>,
}

impl IndexSpec {
    /// An index on `fields`, all ascending, in the given order.
    pub fn ascending(collection: &'static str, fields: &[&'static str]) -> Self {
        Self {
            collection,
            keys: fields.iter().map(|field| (*field, SortOrder::Ascending)).collect(),
            unique: false,
            expire_after: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn expire_after(mut self, duration: Duration) -> Self {
        self.expire_after = Some(duration);
        self
    }

    /// The name the server assigns when none is given: `<field>_<direction>` pairs joined by `_`.
    pub fn name(&self) -> String {
        self.keys.iter().map(|(field, order)| format!("{}_{}", field, order.as_i32())).collect::<Vec<_>>().join("_")
    }

    pub fn keys_document(&self) -> Document {
        let mut keys = Document::new();
        for (field, order) in &self.keys {
            keys.insert(*field, order.as_i32());
        }
        keys
    }

    pub fn to_index_model(&self) -> IndexModel {
        if !self.unique && self.expire_after.is_none() {
            return IndexModel::builder().keys(self.keys_document()).build();
        }

        let mut options = IndexOptions::default();
        if self.unique {
            options.unique = Some(true);
        }
        options.expire_after = self.expire_after;
        IndexModel::builder().keys(self.keys_document()).options(options).build()
    }

    /// Whether `keys` describes the same key pattern, field order included.
    pub fn matches_keys(&self, keys: &Document) -> bool {
        keys.len() == self.keys.len()
            && keys
                .iter()
                .zip(&self.keys)
                .all(|((field, value), (expected_field, expected_order))| {
                    field == expected_field && SortOrder::from_bson(value) == Some(*expected_order)
                })
    }
}

impl fmt::Display for IndexSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.name())?;
        if self.unique {
            write!(f, " (unique)")?;
        }
        if let Some(expire_after) = self.expire_after {
            write!(f, " (expire after {}s)", expire_after.as_secs())?;
        }
        Ok(())
    }
}

/// The indexes of one collection, issued together in a single `createIndexes` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPlan {
    pub collection: &'static str,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionPlan {
    pub fn index_models(&self) -> Vec<IndexModel> {
        self.indexes.iter().map(IndexSpec::to_index_model).collect()
    }
}

/// Every index the action service relies on.
pub fn index_manifest() -> Vec<IndexSpec> {
    vec![
        IndexSpec::ascending(ACTIVE_ACTIONS_COLLECTION, &["server_number", "action_type", "selected_bots", "delay"])
            .unique(),
        IndexSpec::ascending(ACTIVE_ACTIONS_COLLECTION, &["server_number"]),
        IndexSpec::ascending(ACTIVE_ACTIONS_COLLECTION, &["action_type"]),
        IndexSpec::ascending(COMPLETED_OPERATIONS_COLLECTION, &["created_at"])
            .expire_after(Duration::from_secs(COMPLETED_OPERATIONS_TTL_SECS)),
        IndexSpec::ascending(COMPLETED_OPERATIONS_COLLECTION, &["operation_id"]).unique(),
        IndexSpec::ascending(CACHE_VERSION_COLLECTION, &["key"]).unique(),
    ]
}

/// Groups a manifest per collection, keeping the order in which collections and indexes first appear.
pub fn group_by_collection(manifest: &[IndexSpec]) -> Vec<CollectionPlan> {
    let mut plans: Vec<CollectionPlan> = Vec::new();
    for spec in manifest {
        match plans.iter_mut().find(|plan| plan.collection == spec.collection) {
            Some(plan) => plan.indexes.push(spec.clone()),
            None => plans.push(CollectionPlan { collection: spec.collection, indexes: vec![spec.clone()] }),
        }
    }
    plans
}
