//! Deserialization of dbt's `manifest.json` artifact
//!
//! Only the subset of the artifact that lineage extraction needs is
//! modelled; everything else in the file is ignored during parsing.
//! Every field is defaulted so older or partial manifests still load.

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// The parsed manifest artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Invocation metadata (project name, dbt version)
    #[serde(default)]
    pub metadata: ManifestMetadata,

    /// Models, seeds, tests and snapshots, keyed by unique id
    #[serde(default)]
    pub nodes: HashMap<String, ManifestNode>,

    /// Declared sources, keyed by unique id
    #[serde(default)]
    pub sources: HashMap<String, ManifestNode>,
}

/// Top-level metadata block of the manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Project name
    #[serde(default)]
    pub project_name: Option<String>,

    /// dbt version the artifact was produced by
    #[serde(default)]
    pub dbt_version: Option<String>,
}

/// A node entry in the manifest.
///
/// Models, seeds and sources share this shape; fields that only apply
/// to one kind (`loader`, `freshness`) default to empty for the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Node kind: `model`, `seed`, `source`, `test`, ...
    #[serde(default)]
    pub resource_type: String,

    /// Node name
    #[serde(default)]
    pub name: String,

    /// Relation alias, when it differs from the name
    #[serde(default)]
    pub alias: Option<String>,

    /// Fully qualified name: `[project, dir1, ..., node_name]`
    #[serde(default)]
    pub fqn: Vec<String>,

    /// Path of the defining file within the project
    #[serde(default)]
    pub path: String,

    /// Target schema
    #[serde(default)]
    pub schema: String,

    /// Target database
    #[serde(default)]
    pub database: Option<String>,

    /// Node description
    #[serde(default)]
    pub description: String,

    /// Node tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Free-form metadata (`owner`, ...)
    #[serde(default)]
    pub meta: serde_json::Map<String, Value>,

    /// Node configuration
    #[serde(default)]
    pub config: NodeConfig,

    /// Raw model SQL (dbt >= 1.3)
    #[serde(default)]
    pub raw_code: Option<String>,

    /// Raw model SQL (legacy field name)
    #[serde(default)]
    pub raw_sql: Option<String>,

    /// Compiled model SQL (dbt >= 1.3)
    #[serde(default)]
    pub compiled_code: Option<String>,

    /// Compiled model SQL (legacy field name)
    #[serde(default)]
    pub compiled_sql: Option<String>,

    /// Upstream dependencies
    #[serde(default)]
    pub depends_on: DependsOn,

    /// Documented columns, keyed by column name
    #[serde(default)]
    pub columns: HashMap<String, ColumnMeta>,

    /// Loader name (sources only)
    #[serde(default)]
    pub loader: String,

    /// Freshness configuration (sources only)
    #[serde(default)]
    pub freshness: Option<Value>,
}

/// Node configuration subset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Materialization strategy (`view`, `table`, `incremental`, ...)
    #[serde(default)]
    pub materialized: Option<String>,
}

/// Upstream dependencies of a node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependsOn {
    /// Unique ids of upstream nodes and sources
    #[serde(default)]
    pub nodes: Vec<String>,
}

/// Documentation metadata for one column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name
    #[serde(default)]
    pub name: String,

    /// Column description
    #[serde(default)]
    pub description: String,

    /// Declared data type, when documented
    #[serde(default)]
    pub data_type: Option<String>,

    /// Column tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Free-form metadata; `test_not_null` / `test_unique` flags live here
    #[serde(default)]
    pub meta: serde_json::Map<String, Value>,
}

impl Manifest {
    /// Load and parse a manifest file
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
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| CoreError::ArtifactParse {
                path: path.display().to_string(),
                source,
            })?;
        log::debug!(
            "Loaded manifest: {} nodes, {} sources",
            manifest.nodes.len(),
            manifest.sources.len()
        );
        Ok(manifest)
    }

    /// Look up a node by unique id, checking nodes then sources
    pub fn node(&self, unique_id: &str) -> Option<&ManifestNode> {
        self.nodes
            .get(unique_id)
            .or_else(|| self.sources.get(unique_id))
    }

    /// All model nodes
    pub fn model_nodes(&self) -> impl Iterator<Item = (&String, &ManifestNode)> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.resource_type == "model")
    }

    /// All seed nodes
    pub fn seed_nodes(&self) -> impl Iterator<Item = (&String, &ManifestNode)> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.resource_type == "seed")
    }

    /// Project name from metadata, or `unknown`
    pub fn project_name(&self) -> &str {
        self.metadata.project_name.as_deref().unwrap_or("unknown")
    }

    /// dbt version from metadata, or `unknown`
    pub fn dbt_version(&self) -> &str {
        self.metadata.dbt_version.as_deref().unwrap_or("unknown")
    }
}

impl ManifestNode {
    /// The name the node's relation has in the warehouse
    pub fn relation_name(&self) -> &str {
        self.alias.as_deref().filter(|a| !a.is_empty()).unwrap_or(&self.name)
    }

    /// Compiled SQL, falling back to the legacy field name
    pub fn compiled(&self) -> Option<&str> {
        self.compiled_code
            .as_deref()
            .or(self.compiled_sql.as_deref())
            .filter(|sql| !sql.is_empty())
    }

    /// Raw SQL, falling back to the legacy field name
    pub fn raw(&self) -> Option<&str> {
        self.raw_code
            .as_deref()
            .or(self.raw_sql.as_deref())
            .filter(|sql| !sql.is_empty())
    }

    /// Owner from node metadata, if set
    pub fn owner(&self) -> &str {
        self.meta
            .get("owner")
            .and_then(Value::as_str)
            .unwrap_or("")
    }
}

/// Column name → data type for a node, lowercased.
///
/// The catalog is consulted first since it carries the warehouse's actual
/// types; documented manifest columns are the fallback. Missing types map
/// to `unknown`.
pub fn column_schema(
    unique_id: &str,
    catalog: Option<&Catalog>,
    manifest: &Manifest,
) -> HashMap<String, String> {
    let mut columns = HashMap::new();

    if let Some(catalog) = catalog {
        if let Some(cat_node) = catalog.node(unique_id) {
            for (name, col) in &cat_node.columns {
                columns.insert(name.to_lowercase(), col.column_type.clone());
            }
        }
    }

    if columns.is_empty() {
        if let Some(node) = manifest.node(unique_id) {
            for (name, col) in &node.columns {
                columns.insert(
                    name.to_lowercase(),
                    col.data_type.clone().unwrap_or_else(|| "unknown".to_string()),
                );
            }
        }
    }

    columns
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
