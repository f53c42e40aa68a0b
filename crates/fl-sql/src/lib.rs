//! fl-sql - SQL lineage core for Flowline
//!
//! This crate wraps sqlparser-rs with dialect support and implements the
//! lineage-resolution engine: alias resolution, transformation
//! classification, column source extraction, CTE dataflow mapping,
//! recursive backward tracing, and upstream binding into column edges.

pub mod alias;
pub mod classify;
pub mod columns;
pub mod cte;
pub mod dialect;
pub mod error;
pub mod lineage;
pub mod parser;
pub mod trace;

pub use alias::{build_alias_map, AliasMap};
pub use classify::{classify, classify_expr, TransformationKind};
pub use columns::{extract_column_refs, SourceRef};
pub use cte::{resolve_ctes, CteDataflowMap};
pub use dialect::SqlDialect;
pub use error::{SqlError, SqlResult};
pub use lineage::{
    ColumnDefinition, ColumnEdge, Diagnostic, DiagnosticStage, StatementLineage, UpstreamRef,
};
pub use parser::SqlParser;
pub use trace::trace_to_terminals;

use sqlparser::ast::{ObjectName, Query, Select, SetExpr};

/// Render an `ObjectName` as a dotted string (`db.schema.table`).
///
/// Function-style name parts (ClickHouse table functions etc.) are rendered
/// through their `Display` impl.
pub fn object_name_to_string(name: &ObjectName) -> String {
    name.0
        .iter()
        .map(|part| match part.as_ident() {
            Some(ident) => ident.value.clone(),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Locate the outermost SELECT of a query.
///
/// For set operations (UNION/INTERSECT/EXCEPT) the column names come from
/// the leftmost operand by SQL convention, so that is the SELECT returned.
pub fn final_select(query: &Query) -> Option<&Select> {
    fn from_set_expr(body: &SetExpr) -> Option<&Select> {
        match body {
            SetExpr::Select(select) => Some(select),
            SetExpr::Query(inner) => from_set_expr(&inner.body),
            SetExpr::SetOperation { left, .. } => from_set_expr(left),
            _ => None,
        }
    }
    from_set_expr(&query.body)
}
