//! fl-core - Core library for Flowline
//!
//! This crate provides typed views over dbt's `manifest.json` and
//! `catalog.json` artifacts plus the layer classification shared across
//! Flowline components.

pub mod catalog;
pub mod error;
pub mod layer;
pub mod manifest;

pub use catalog::{Catalog, CatalogColumn, CatalogNode, CatalogStat};
pub use error::{CoreError, CoreResult};
pub use layer::{classify_layer, directory_from_fqn, Layer};
pub use manifest::{
    column_schema, ColumnMeta, DependsOn, Manifest, ManifestMetadata, ManifestNode, NodeConfig,
};
