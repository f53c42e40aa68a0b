//! Recursive backward tracing through CTE dataflow maps

use crate::cte::CteDataflowMap;
use std::collections::HashSet;

/// Trace a `(table, column)` pair backward through the CTE map to the
/// ultimate base-table columns.
///
/// A table name that is not a key of the map is a terminal reference and
/// is returned as-is. A known CTE missing the requested column (wildcard
/// or unresolvable output) is also treated as terminal, as is any branch
/// whose recursion yields nothing, so a trace never silently vanishes.
/// The visited set bounds recursion on self-referential or mutually
/// recursive definitions: invalid SQL, but it must not hang the tracer.
pub fn trace_to_terminals(
    table: &str,
    column: &str,
    cte_map: &CteDataflowMap,
) -> Vec<(String, String)> {
    let mut visited = HashSet::new();
    trace_inner(table, column, cte_map, &mut visited)
}

fn trace_inner(
    table: &str,
    column: &str,
    cte_map: &CteDataflowMap,
    visited: &mut HashSet<(String, String)>,
) -> Vec<(String, String)> {
    if !visited.insert((table.to_string(), column.to_string())) {
        return Vec::new();
    }

    let Some(cte_columns) = cte_map.get(table) else {
        return vec![(table.to_string(), column.to_string())];
    };

    let Some(sources) = cte_columns.get(column) else {
        return vec![(table.to_string(), column.to_string())];
    };

    let mut terminals = Vec::new();
    for (source_table, source_column) in sources {
        terminals.extend(trace_inner(source_table, source_column, cte_map, visited));
    }

    if terminals.is_empty() {
        vec![(table.to_string(), column.to_string())]
    } else {
        terminals
    }
}

#[cfg(test)]
#[path = "trace_test.rs"]
mod tests;
