//! Extract command implementation — builds the lineage document from dbt artifacts

use anyhow::{Context, Result};
use chrono::Utc;
use fl_core::{
    classify_layer, column_schema, directory_from_fqn, Catalog, Manifest, ManifestNode,
};
use fl_sql::{ColumnEdge, Diagnostic, SqlParser, StatementLineage, UpstreamRef};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::cli::{ExtractArgs, GlobalArgs};
use crate::document::{
    ColumnRecord, DocumentMetadata, DocumentStats, LineageDocument, ModelRecord, ModelStats,
    SeedRecord, SourceColumnRecord, SourceRecord, TableEdge,
};

/// Execute the extract command
pub async fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let parser = SqlParser::from_dialect_name(&args.dialect).context("Invalid SQL dialect")?;

    log::debug!("Loading manifest from {}", args.manifest);
    let manifest =
        Manifest::load(Path::new(&args.manifest)).context("Failed to load manifest")?;

    let catalog = match &args.catalog {
        Some(path) if Path::new(path).exists() => {
            Some(Catalog::load(Path::new(path)).context("Failed to load catalog")?)
        }
        Some(path) => {
            if global.verbose {
                eprintln!("[verbose] Catalog not found at '{}', continuing without it", path);
            }
            None
        }
        None => None,
    };

    let document = build_document(
        &manifest,
        catalog.as_ref(),
        &parser,
        &args.dialect,
        &args.commit_sha,
    );

    let output_path = Path::new(&args.output);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create '{}'", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write '{}'", output_path.display()))?;

    println!("✓ Written to {}", output_path.display());
    println!("  Models: {}", document.metadata.stats.models);
    println!("  Sources: {}", document.metadata.stats.sources);
    println!("  Column edges: {}", document.metadata.stats.column_edges);
    println!("  Errors: {}", document.metadata.stats.errors);

    Ok(())
}

/// Build the complete lineage document from loaded artifacts.
///
/// Nodes are processed in unique-id order so repeated runs over the same
/// artifacts produce identical documents.
pub(crate) fn build_document(
    manifest: &Manifest,
    catalog: Option<&Catalog>,
    parser: &SqlParser,
    dialect: &str,
    commit_sha: &str,
) -> LineageDocument {
    let mut models = Vec::new();
    let mut table_edges = Vec::new();
    let mut column_edges = Vec::new();
    let mut errors = Vec::new();

    let mut model_uids: Vec<&String> = manifest.model_nodes().map(|(uid, _)| uid).collect();
    model_uids.sort();

    for uid in &model_uids {
        let node = &manifest.nodes[*uid];
        models.push(extract_model(
            uid,
            node,
            manifest,
            catalog,
            parser,
            &mut column_edges,
            &mut errors,
        ));

        for dep_uid in &node.depends_on.nodes {
            table_edges.push(TableEdge {
                source: dep_uid.clone(),
                target: (*uid).clone(),
            });
        }
    }

    let mut source_uids: Vec<&String> = manifest.sources.keys().collect();
    source_uids.sort();
    let sources: Vec<SourceRecord> = source_uids
        .iter()
        .map(|uid| extract_source(uid, &manifest.sources[*uid], catalog))
        .collect();

    let mut seed_uids: Vec<&String> = manifest.seed_nodes().map(|(uid, _)| uid).collect();
    seed_uids.sort();
    let seeds: Vec<SeedRecord> = seed_uids
        .iter()
        .map(|uid| extract_seed(uid, &manifest.nodes[*uid]))
        .collect();

    let stats = DocumentStats {
        models: models.len(),
        sources: sources.len(),
        seeds: seeds.len(),
        columns: models.iter().map(|m| m.columns.len()).sum(),
        table_edges: table_edges.len(),
        column_edges: column_edges.len(),
        errors: errors.len(),
    };

    LineageDocument {
        metadata: DocumentMetadata {
            generated_at: Utc::now().to_rfc3339(),
            commit_sha: commit_sha.to_string(),
            dbt_project: manifest.project_name().to_string(),
            dbt_version: manifest.dbt_version().to_string(),
            dialect: dialect.to_string(),
            stats,
        },
        models,
        sources,
        seeds,
        table_edges,
        column_edges,
        errors,
    }
}

/// Upstream references for a node, carrying each dependency's known
/// columns for same-name fallback matching.
fn upstream_refs(
    node: &ManifestNode,
    manifest: &Manifest,
    catalog: Option<&Catalog>,
) -> Vec<UpstreamRef> {
    node.depends_on
        .nodes
        .iter()
        .map(|dep_uid| {
            let name = manifest
                .node(dep_uid)
                .map(ManifestNode::relation_name)
                .unwrap_or("");
            UpstreamRef::new(dep_uid, name)
                .with_columns(column_schema(dep_uid, catalog, manifest).into_keys())
        })
        .collect()
}

/// Extract one model: column records plus its share of the column edges.
fn extract_model(
    uid: &str,
    node: &ManifestNode,
    manifest: &Manifest,
    catalog: Option<&Catalog>,
    parser: &SqlParser,
    column_edges: &mut Vec<ColumnEdge>,
    errors: &mut Vec<Diagnostic>,
) -> ModelRecord {
    let dependencies = upstream_refs(node, manifest, catalog);
    let cat_node = catalog.and_then(|c| c.nodes.get(uid));

    // Parse the compiled SQL once; everything column-level hangs off it.
    let query = node.compiled().and_then(|sql| match parser.parse_query(sql) {
        Ok(query) => Some(query),
        Err(e) => {
            errors.push(Diagnostic::parse(uid, e.to_string()));
            None
        }
    });
    let lineage = query.as_deref().map(StatementLineage::new);

    // Column names come from three places: the SQL projection, documented
    // manifest columns, and the catalog. A wildcard projection falls back
    // to the node's own schema.
    let mut column_names = BTreeSet::new();
    if let Some(lineage) = &lineage {
        let (names, has_wildcard) = lineage.output_columns();
        column_names.extend(names);
        if has_wildcard {
            column_names.extend(column_schema(uid, catalog, manifest).into_keys());
        }
    }
    column_names.extend(node.columns.keys().map(|name| name.to_lowercase()));
    if let Some(cat_node) = cat_node {
        column_names.extend(cat_node.columns.keys().map(|name| name.to_lowercase()));
    }

    let mut columns = Vec::new();
    for name in &column_names {
        let col_meta = node.columns.get(name).cloned().unwrap_or_default();
        let data_type = cat_node
            .and_then(|n| n.column_type(name))
            .map(str::to_string)
            .or(col_meta.data_type)
            .unwrap_or_else(|| "unknown".to_string());

        let definition = lineage.as_ref().and_then(|l| l.column_definition(name));

        let mut tests = Vec::new();
        if meta_flag(&col_meta.meta, "test_not_null") {
            tests.push("not_null".to_string());
        }
        if meta_flag(&col_meta.meta, "test_unique") {
            tests.push("unique".to_string());
        }

        columns.push(ColumnRecord {
            name: name.clone(),
            description: col_meta.description,
            data_type,
            definition: definition
                .as_ref()
                .map(|d| d.definition.clone())
                .unwrap_or_default(),
            is_transformed: definition
                .as_ref()
                .is_some_and(|d| d.kind.is_transformed()),
            transformation_type: definition.as_ref().map(|d| d.kind),
            source_columns: definition
                .map(|d| d.source_columns)
                .unwrap_or_default(),
            tests,
            tags: col_meta.tags,
            meta: col_meta.meta,
        });

        if let Some(lineage) = &lineage {
            lineage.column_edges(uid, name, &dependencies, column_edges, errors);
        }
    }

    let stats = cat_node
        .map(|n| ModelStats {
            row_count: n.stat("row_count").cloned(),
            bytes: n.stat("bytes").cloned(),
        })
        .unwrap_or_default();

    ModelRecord {
        unique_id: uid.to_string(),
        name: node.relation_name().to_string(),
        description: node.description.clone(),
        schema: node.schema.clone(),
        database: node.database.clone().unwrap_or_default(),
        materialized: node
            .config
            .materialized
            .clone()
            .unwrap_or_else(|| "view".to_string()),
        layer: classify_layer(uid, &node.fqn),
        directory: directory_from_fqn(&node.fqn),
        fqn: node.fqn.clone(),
        path: node.path.clone(),
        tags: node.tags.clone(),
        owner: node.owner().to_string(),
        raw_code: node.raw().unwrap_or_default().to_string(),
        compiled_code: node.compiled().unwrap_or_default().to_string(),
        depends_on: node.depends_on.nodes.clone(),
        columns,
        stats,
    }
}

/// Extract one declared source
fn extract_source(uid: &str, node: &ManifestNode, catalog: Option<&Catalog>) -> SourceRecord {
    let cat_node = catalog.and_then(|c| c.sources.get(uid));

    let mut names: BTreeSet<String> = node.columns.keys().cloned().collect();
    if let Some(cat_node) = cat_node {
        names.extend(cat_node.columns.keys().cloned());
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let col_meta = node.columns.get(&name).cloned().unwrap_or_default();
            let data_type = cat_node
                .and_then(|n| n.column_type(&name))
                .map(str::to_string)
                .or(col_meta.data_type)
                .unwrap_or_else(|| "unknown".to_string());
            SourceColumnRecord {
                name,
                description: col_meta.description,
                data_type,
            }
        })
        .collect();

    SourceRecord {
        unique_id: uid.to_string(),
        name: node.name.clone(),
        description: node.description.clone(),
        database: node.database.clone().unwrap_or_default(),
        schema: node.schema.clone(),
        loader: node.loader.clone(),
        columns,
        freshness: node.freshness.clone(),
    }
}

/// Extract one seed
fn extract_seed(uid: &str, node: &ManifestNode) -> SeedRecord {
    let mut names: Vec<&String> = node.columns.keys().collect();
    names.sort();

    let columns = names
        .into_iter()
        .map(|name| {
            let col_meta = &node.columns[name];
            SourceColumnRecord {
                name: name.clone(),
                description: col_meta.description.clone(),
                data_type: col_meta
                    .data_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            }
        })
        .collect();

    SeedRecord {
        unique_id: uid.to_string(),
        name: node.name.clone(),
        description: node.description.clone(),
        schema: node.schema.clone(),
        columns,
    }
}

/// True when a meta flag is set to a truthy value
fn meta_flag(meta: &serde_json::Map<String, Value>, key: &str) -> bool {
    match meta.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
