//! Column-level lineage extraction from SQL AST
//!
//! Ties the pieces together for one parsed statement: alias map + CTE
//! dataflow map up front, then per-output-column backward tracing into
//! globally unique upstream column edges.

use crate::alias::{build_alias_map, resolve_source, AliasMap};
use crate::classify::{classify, TransformationKind};
use crate::columns::extract_column_refs;
use crate::cte::{resolve_ctes, CteDataflowMap};
use crate::final_select;
use crate::trace::trace_to_terminals;
use serde::{Deserialize, Serialize};
use sqlparser::ast::{Expr, Query, SelectItem};
use std::collections::HashSet;

/// A declared upstream dependency of a node, used to bind terminal table
/// names to globally unique node identifiers.
#[derive(Debug, Clone)]
pub struct UpstreamRef {
    /// Globally unique node identifier (e.g. `model.proj.stg_orders`)
    pub unique_id: String,
    /// Canonical short name used for table-name matching in SQL
    pub name: String,
    /// Known column names, lowercased, for same-name fallback matching
    pub columns: HashSet<String>,
}

impl UpstreamRef {
    /// Create an upstream reference without column information
    pub fn new(unique_id: &str, name: &str) -> Self {
        Self {
            unique_id: unique_id.to_string(),
            name: name.to_string(),
            columns: HashSet::new(),
        }
    }

    /// Attach the dependency's known column set
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = String>) -> Self {
        self.columns = columns.into_iter().map(|c| c.to_lowercase()).collect();
        self
    }
}

/// One directed column-level lineage edge.
///
/// Source and target are `<node_id>.<column>` identifiers. Duplicate edges
/// are not deduplicated; every discovered (source, transformation) pair is
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEdge {
    /// Source column identifier
    pub source: String,
    /// Target column identifier
    pub target: String,
    /// Rendered transformation expression (empty for fallback-resolved edges)
    pub transformation: String,
    /// Transformation kind tag
    #[serde(rename = "type")]
    pub kind: TransformationKind,
}

/// Pipeline stage a diagnostic originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStage {
    /// SQL could not be parsed under the configured dialect
    Parse,
    /// A terminal reference could not be bound to a declared dependency
    Bind,
    /// Node-level extraction failure outside the core
    Extract,
}

/// A non-fatal failure recorded during extraction.
///
/// No failure in the core is fatal to a run; the orchestrating caller
/// decides whether accumulated diagnostics should fail the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stage the failure occurred in
    pub stage: DiagnosticStage,
    /// Node whose extraction hit the failure
    pub node_id: String,
    /// Output column, when the failure is column-scoped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Parse-stage diagnostic for a node
    pub fn parse(node_id: &str, message: String) -> Self {
        Self {
            stage: DiagnosticStage::Parse,
            node_id: node_id.to_string(),
            column: None,
            message,
        }
    }

    /// Bind-stage diagnostic for a single column edge
    pub fn bind(node_id: &str, column: &str, message: String) -> Self {
        Self {
            stage: DiagnosticStage::Bind,
            node_id: node_id.to_string(),
            column: Some(column.to_string()),
            message,
        }
    }

    /// Node-level extraction diagnostic
    pub fn extract(node_id: &str, message: String) -> Self {
        Self {
            stage: DiagnosticStage::Extract,
            node_id: node_id.to_string(),
            column: None,
            message,
        }
    }
}

/// The SQL definition of one output column, for documentation output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Rendered expression text (without the output alias)
    pub definition: String,
    /// Transformation kind
    pub kind: TransformationKind,
    /// Names of source columns referenced by the expression
    pub source_columns: Vec<String>,
}

/// Lineage context for one parsed statement.
///
/// The alias map covers the outermost query scope; the CTE dataflow map
/// covers every CTE the statement defines. Both are built once and reused
/// across all of the node's output columns. Discarded with the statement;
/// nothing is retained across nodes.
pub struct StatementLineage<'a> {
    query: &'a Query,
    aliases: AliasMap,
    cte_map: CteDataflowMap,
}

impl<'a> StatementLineage<'a> {
    /// Build the per-statement lineage context
    pub fn new(query: &'a Query) -> Self {
        Self {
            query,
            aliases: build_alias_map(query),
            cte_map: resolve_ctes(query),
        }
    }

    /// The statement's CTE dataflow map
    pub fn cte_map(&self) -> &CteDataflowMap {
        &self.cte_map
    }

    /// Output column names of the final SELECT, lowercased, plus a flag
    /// for wildcard items (whose columns must come from schema metadata).
    pub fn output_columns(&self) -> (Vec<String>, bool) {
        let mut names = Vec::new();
        let mut has_wildcard = false;

        let Some(select) = final_select(self.query) else {
            return (names, has_wildcard);
        };

        for item in &select.projection {
            match item {
                SelectItem::ExprWithAlias { alias, .. } => {
                    names.push(alias.value.to_lowercase());
                }
                SelectItem::UnnamedExpr(expr) => match expr {
                    Expr::Identifier(ident) => names.push(ident.value.to_lowercase()),
                    Expr::CompoundIdentifier(idents) => {
                        if let Some(last) = idents.last() {
                            names.push(last.value.to_lowercase());
                        }
                    }
                    // Un-aliased complex expressions have no usable name.
                    _ => {}
                },
                SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => {
                    has_wildcard = true;
                }
            }
        }

        (names, has_wildcard)
    }

    /// Locate the SELECT item producing the requested output column.
    fn find_output(&self, column: &str) -> Option<(&'a Expr, TransformationKind)> {
        let select = final_select(self.query)?;

        for item in &select.projection {
            match item {
                SelectItem::ExprWithAlias { expr, alias }
                    if alias.value.eq_ignore_ascii_case(column) =>
                {
                    return Some((expr, classify(item)));
                }
                SelectItem::UnnamedExpr(expr) => {
                    let name = match expr {
                        Expr::Identifier(ident) => Some(ident.value.as_str()),
                        Expr::CompoundIdentifier(idents) => {
                            idents.last().map(|i| i.value.as_str())
                        }
                        _ => None,
                    };
                    if name.is_some_and(|n| n.eq_ignore_ascii_case(column)) {
                        return Some((expr, classify(item)));
                    }
                }
                _ => {}
            }
        }

        None
    }

    /// The definition of one output column, if it appears in the final
    /// SELECT list.
    pub fn column_definition(&self, column: &str) -> Option<ColumnDefinition> {
        let (expr, kind) = self.find_output(column)?;
        let source_columns = extract_column_refs(expr)
            .into_iter()
            .map(|source| source.column)
            .collect();
        Some(ColumnDefinition {
            definition: expr.to_string(),
            kind,
            source_columns,
        })
    }

    /// Emit column edges for one `(node, output column)` pair.
    ///
    /// Edges and diagnostics are appended to the caller's sinks; nothing
    /// here is fatal. When the column is absent from the final SELECT
    /// (wildcard or pass-through the AST match missed), a same-name match
    /// against each dependency's column set emits direct edges instead.
    pub fn column_edges(
        &self,
        node_id: &str,
        column: &str,
        dependencies: &[UpstreamRef],
        edges: &mut Vec<ColumnEdge>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let target = format!("{}.{}", node_id, column);

        let Some((expr, kind)) = self.find_output(column) else {
            for dep in dependencies {
                if dep.columns.contains(&column.to_lowercase()) {
                    edges.push(ColumnEdge {
                        source: format!("{}.{}", dep.unique_id, column),
                        target: target.clone(),
                        transformation: String::new(),
                        kind: TransformationKind::Direct,
                    });
                }
            }
            return;
        };

        let definition = expr.to_string();

        for source in extract_column_refs(expr) {
            // Single-dependency shortcut for unqualified references: avoids
            // false negatives when the SQL never aliases its one input.
            if source.table.is_none() && dependencies.len() == 1 {
                edges.push(ColumnEdge {
                    source: format!("{}.{}", dependencies[0].unique_id, source.column),
                    target: target.clone(),
                    transformation: definition.clone(),
                    kind,
                });
                continue;
            }

            let (table, source_column) = resolve_source(&self.aliases, &source);

            let terminals = if table.is_empty() {
                vec![(table, source_column)]
            } else {
                trace_to_terminals(&table, &source_column, &self.cte_map)
            };

            for (terminal_table, terminal_column) in terminals {
                match bind_upstream(&terminal_table, dependencies) {
                    Some(dep) => edges.push(ColumnEdge {
                        source: format!("{}.{}", dep.unique_id, terminal_column),
                        target: target.clone(),
                        transformation: definition.clone(),
                        kind,
                    }),
                    None => {
                        log::debug!(
                            "could not resolve table '{}' for {}",
                            terminal_table,
                            target
                        );
                        diagnostics.push(Diagnostic::bind(
                            node_id,
                            column,
                            format!(
                                "unresolved reference: table '{}' does not match any declared dependency",
                                terminal_table
                            ),
                        ));
                    }
                }
            }
        }
    }
}

/// Map a terminal table name to a declared upstream dependency.
///
/// Suffix match first (`analytics.stg_orders` ends with `stg_orders`),
/// then substring containment as a fuzzy fallback; the first declared
/// dependency satisfying either rule wins, so ties break by declaration
/// order. Containment can mis-bind when one table name is a substring of
/// another (`users` vs `power_users`); that ambiguity is inherited from
/// the matching scheme and deliberately left as-is.
pub fn bind_upstream<'d>(
    terminal_table: &str,
    dependencies: &'d [UpstreamRef],
) -> Option<&'d UpstreamRef> {
    let table = terminal_table.to_lowercase();
    dependencies.iter().find(|dep| {
        let name = dep.name.to_lowercase();
        !name.is_empty() && (table.ends_with(&name) || table.contains(&name))
    })
}

#[cfg(test)]
#[path = "lineage_test.rs"]
mod tests;
