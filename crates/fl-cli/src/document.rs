//! The lineage document written by `flowline extract`
//!
//! One self-contained JSON file per run: node metadata, per-column
//! definitions, table-level edges and column-level edges, plus any
//! diagnostics accumulated along the way.

use fl_core::Layer;
use fl_sql::{ColumnEdge, Diagnostic, TransformationKind};
use serde::Serialize;
use serde_json::Value;

/// Top-level document structure
#[derive(Debug, Serialize)]
pub struct LineageDocument {
    pub metadata: DocumentMetadata,
    pub models: Vec<ModelRecord>,
    pub sources: Vec<SourceRecord>,
    pub seeds: Vec<SeedRecord>,
    pub table_edges: Vec<TableEdge>,
    pub column_edges: Vec<ColumnEdge>,
    pub errors: Vec<Diagnostic>,
}

/// Run metadata and summary counts
#[derive(Debug, Serialize)]
pub struct DocumentMetadata {
    /// RFC 3339 timestamp of the run
    pub generated_at: String,
    /// Commit the artifacts were built from
    pub commit_sha: String,
    /// dbt project name
    pub dbt_project: String,
    /// dbt version that produced the artifacts
    pub dbt_version: String,
    /// SQL dialect used for parsing
    pub dialect: String,
    /// Summary counts
    pub stats: DocumentStats,
}

/// Summary counts for the document
#[derive(Debug, Default, Serialize)]
pub struct DocumentStats {
    pub models: usize,
    pub sources: usize,
    pub seeds: usize,
    pub columns: usize,
    pub table_edges: usize,
    pub column_edges: usize,
    pub errors: usize,
}

/// One model in the document
#[derive(Debug, Serialize)]
pub struct ModelRecord {
    pub unique_id: String,
    pub name: String,
    pub description: String,
    pub schema: String,
    pub database: String,
    pub materialized: String,
    pub layer: Layer,
    pub directory: String,
    pub fqn: Vec<String>,
    pub path: String,
    pub tags: Vec<String>,
    pub owner: String,
    pub raw_code: String,
    pub compiled_code: String,
    pub depends_on: Vec<String>,
    pub columns: Vec<ColumnRecord>,
    pub stats: ModelStats,
}

/// Warehouse statistics for one model, when a catalog is available
#[derive(Debug, Default, Serialize)]
pub struct ModelStats {
    pub row_count: Option<Value>,
    pub bytes: Option<Value>,
}

/// One output column of a model
#[derive(Debug, Serialize)]
pub struct ColumnRecord {
    pub name: String,
    pub description: String,
    pub data_type: String,
    /// Rendered SQL producing the column, empty when unavailable
    pub definition: String,
    pub is_transformed: bool,
    pub transformation_type: Option<TransformationKind>,
    pub source_columns: Vec<String>,
    pub tests: Vec<String>,
    pub tags: Vec<String>,
    pub meta: serde_json::Map<String, Value>,
}

/// One declared source in the document
#[derive(Debug, Serialize)]
pub struct SourceRecord {
    pub unique_id: String,
    pub name: String,
    pub description: String,
    pub database: String,
    pub schema: String,
    pub loader: String,
    pub columns: Vec<SourceColumnRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freshness: Option<Value>,
}

/// One seed in the document
#[derive(Debug, Serialize)]
pub struct SeedRecord {
    pub unique_id: String,
    pub name: String,
    pub description: String,
    pub schema: String,
    pub columns: Vec<SourceColumnRecord>,
}

/// A column of a source or seed
#[derive(Debug, Serialize)]
pub struct SourceColumnRecord {
    pub name: String,
    pub description: String,
    pub data_type: String,
}

/// One table-level dependency edge between nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableEdge {
    pub source: String,
    pub target: String,
}
