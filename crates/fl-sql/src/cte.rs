//! CTE dataflow resolution
//!
//! For every CTE defined in a statement this computes its internal
//! column-to-source-column mapping, using the CTE's own alias map and the
//! column source extractor on its SELECT list. Cross-CTE references are
//! left unresolved here and followed lazily at trace time, so no
//! assumption is made about definition order.

use crate::alias::{build_select_alias_map, resolve_source};
use crate::columns::extract_column_refs;
use crate::final_select;
use sqlparser::ast::{Expr, Query, SelectItem};
use std::collections::HashMap;

/// Mapping: CTE name -> output column -> ordered `(source_table, source_column)`
/// pairs. A source table that is itself a key of the map is another CTE;
/// anything else is a terminal (base-table) name at trace time.
pub type CteDataflowMap = HashMap<String, HashMap<String, Vec<(String, String)>>>;

/// Resolve every CTE defined anywhere in a statement, including CTEs
/// declared inside other CTE bodies.
pub fn resolve_ctes(query: &Query) -> CteDataflowMap {
    let mut map = CteDataflowMap::new();
    collect_ctes(query, &mut map);
    map
}

fn collect_ctes(query: &Query, map: &mut CteDataflowMap) {
    let Some(with) = &query.with else {
        return;
    };
    for cte in &with.cte_tables {
        // A CTE body may carry its own WITH clause.
        collect_ctes(&cte.query, map);

        let name = cte.alias.name.value.to_lowercase();
        map.insert(name, cte_column_map(&cte.query));
    }
}

/// Build the column-to-sources mapping for one CTE body.
fn cte_column_map(query: &Query) -> HashMap<String, Vec<(String, String)>> {
    let Some(select) = final_select(query) else {
        return HashMap::new();
    };

    let aliases = build_select_alias_map(select);
    let mut columns = HashMap::new();

    for item in &select.projection {
        let (output, expr) = match item {
            SelectItem::ExprWithAlias { expr, alias } => (alias.value.to_lowercase(), expr),
            SelectItem::UnnamedExpr(expr) => match output_column_name(expr) {
                Some(name) => (name, expr),
                None => continue,
            },
            // Wildcards are skipped, not expanded; schema is not always
            // available at this stage.
            SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => continue,
        };

        let sources = extract_column_refs(expr)
            .iter()
            .map(|source| resolve_source(&aliases, source))
            .collect();
        columns.insert(output, sources);
    }

    columns
}

/// Output column name for an un-aliased SELECT item.
///
/// Bare column references use their own name. Any other expression is
/// keyed by a truncated rendering of its SQL text: stable within one run,
/// but with no uniqueness guarantee across long, similar expressions. That
/// collision window is a known limitation of the keying scheme.
fn output_column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.to_lowercase()),
        Expr::CompoundIdentifier(idents) => idents.last().map(|i| i.value.to_lowercase()),
        other => {
            let rendered = other.to_string().to_lowercase();
            Some(rendered.chars().take(50).collect())
        }
    }
}

#[cfg(test)]
#[path = "cte_test.rs"]
mod tests;
