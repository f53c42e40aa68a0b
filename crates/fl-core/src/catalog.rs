//! Deserialization of dbt's `catalog.json` artifact
//!
//! The catalog is produced by `dbt docs generate` and reflects what the
//! warehouse actually contains: real column types and table statistics.
//! It is optional everywhere; extraction degrades to manifest metadata
//! when no catalog is supplied.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The parsed catalog artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Model, seed and snapshot relations, keyed by unique id
    #[serde(default)]
    pub nodes: HashMap<String, CatalogNode>,

    /// Source relations, keyed by unique id
    #[serde(default)]
    pub sources: HashMap<String, CatalogNode>,
}

/// One relation in the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogNode {
    /// Columns keyed by name, as the warehouse reports them
    #[serde(default)]
    pub columns: HashMap<String, CatalogColumn>,

    /// Relation statistics keyed by stat id (`row_count`, `bytes`, ...)
    #[serde(default)]
    pub stats: HashMap<String, CatalogStat>,
}

/// A column as reported by the warehouse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Column name
    #[serde(default)]
    pub name: String,

    /// Warehouse data type
    #[serde(rename = "type", default)]
    pub column_type: String,

    /// Ordinal position
    #[serde(default)]
    pub index: Option<u64>,

    /// Column comment
    #[serde(default)]
    pub comment: Option<String>,
}

/// One statistic value for a relation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogStat {
    /// The stat's value; type varies per stat
    #[serde(default)]
    pub value: Option<Value>,
}

impl Catalog {
    /// Load and parse a catalog file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ArtifactNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| CoreError::ArtifactRead {
            path: path.display().to_string(),
            source,
        })?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|source| CoreError::ArtifactParse {
                path: path.display().to_string(),
                source,
            })?;
        log::debug!(
            "Loaded catalog: {} nodes, {} sources",
            catalog.nodes.len(),
            catalog.sources.len()
        );
        Ok(catalog)
    }

    /// Look up a relation by unique id, checking nodes then sources
    pub fn node(&self, unique_id: &str) -> Option<&CatalogNode> {
        self.nodes
            .get(unique_id)
            .or_else(|| self.sources.get(unique_id))
    }
}

impl CatalogNode {
    /// Warehouse type of a column, matching the exact name first and its
    /// uppercase form second (Snowflake catalogs report uppercase names)
    pub fn column_type(&self, name: &str) -> Option<&str> {
        self.columns
            .get(name)
            .or_else(|| self.columns.get(&name.to_uppercase()))
            .map(|col| col.column_type.as_str())
    }

    /// A statistic's value, when the warehouse reported one
    pub fn stat(&self, key: &str) -> Option<&Value> {
        self.stats.get(key).and_then(|stat| stat.value.as_ref())
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
