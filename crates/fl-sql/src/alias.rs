//! Table alias resolution for a single query scope

use crate::columns::SourceRef;
use crate::{final_select, object_name_to_string};
use sqlparser::ast::{Query, Select, TableFactor, TableWithJoins};
use std::collections::HashMap;

/// Mapping from table alias (or bare table name) to canonical table/CTE
/// name, scoped to exactly one query level. Keys and values are lowercased.
pub type AliasMap = HashMap<String, String>;

/// Build the alias map for the outermost scope of a query.
///
/// Only the FROM and JOIN clauses of that one scope are scanned; nested
/// subqueries and CTE bodies each get their own map via a separate call.
pub fn build_alias_map(query: &Query) -> AliasMap {
    final_select(query).map(build_select_alias_map).unwrap_or_default()
}

/// Build the alias map for one SELECT's FROM/JOIN clauses.
pub fn build_select_alias_map(select: &Select) -> AliasMap {
    let mut aliases = AliasMap::new();
    for table in &select.from {
        collect_table_aliases(table, &mut aliases);
    }
    aliases
}

fn collect_table_aliases(table_with_joins: &TableWithJoins, aliases: &mut AliasMap) {
    collect_factor_alias(&table_with_joins.relation, aliases);
    for join in &table_with_joins.joins {
        collect_factor_alias(&join.relation, aliases);
    }
}

fn collect_factor_alias(factor: &TableFactor, aliases: &mut AliasMap) {
    match factor {
        TableFactor::Table { name, alias, .. } => {
            let table_name = object_name_to_string(name).to_lowercase();
            // Key is the explicit alias when present, else the bare table
            // name (the qualifier SQL permits for an unaliased table).
            // Duplicate aliases are last-write-wins, not an error.
            let key = match alias {
                Some(alias) => alias.name.value.to_lowercase(),
                None => table_name
                    .rsplit('.')
                    .next()
                    .unwrap_or(table_name.as_str())
                    .to_string(),
            };
            aliases.insert(key, table_name);
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            collect_table_aliases(table_with_joins, aliases);
        }
        // Derived tables (subqueries in FROM) keep their own scope; their
        // aliases do not resolve to a table name at this level.
        _ => {}
    }
}

/// Resolve one column reference's alias component through an alias map.
///
/// Returns the canonical `(table_or_cte_name, column_name)` pair. A
/// qualified reference that misses the map falls back to the raw alias
/// text. An unqualified reference resolves to the scope's table when the
/// scope reads from exactly one, and to an empty name otherwise.
pub fn resolve_source(aliases: &AliasMap, source: &SourceRef) -> (String, String) {
    let table = match &source.table {
        Some(alias) => aliases.get(alias).cloned().unwrap_or_else(|| alias.clone()),
        None => single_scope_table(aliases).unwrap_or_default(),
    };
    (table, source.column.clone())
}

/// The scope's sole table name, if the alias map has exactly one distinct
/// value.
fn single_scope_table(aliases: &AliasMap) -> Option<String> {
    let mut values = aliases.values();
    let first = values.next()?;
    if values.all(|v| v == first) {
        Some(first.clone())
    } else {
        None
    }
}

#[cfg(test)]
#[path = "alias_test.rs"]
mod tests;
