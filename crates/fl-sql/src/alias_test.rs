use super::*;
use crate::parser::SqlParser;

fn alias_map(sql: &str) -> AliasMap {
    let query = SqlParser::generic().parse_query(sql).unwrap();
    build_alias_map(&query)
}

#[test]
fn test_aliased_join() {
    let map = alias_map(
        "SELECT a.id, SUM(b.amount) AS total FROM orders a \
         JOIN line_items b ON a.id = b.order_id GROUP BY a.id",
    );
    assert_eq!(map.get("a"), Some(&"orders".to_string()));
    assert_eq!(map.get("b"), Some(&"line_items".to_string()));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_bare_table_name_is_its_own_alias() {
    let map = alias_map("SELECT id FROM customers");
    assert_eq!(map.get("customers"), Some(&"customers".to_string()));
}

#[test]
fn test_schema_qualified_table() {
    let map = alias_map("SELECT id FROM raw.orders");
    assert_eq!(map.get("orders"), Some(&"raw.orders".to_string()));

    let map = alias_map("SELECT o.id FROM raw.orders o");
    assert_eq!(map.get("o"), Some(&"raw.orders".to_string()));
}

#[test]
fn test_duplicate_alias_last_write_wins() {
    let map = alias_map("SELECT 1 FROM first_t AS x, second_t AS x");
    assert_eq!(map.get("x"), Some(&"second_t".to_string()));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_scope_does_not_include_cte_bodies() {
    let map = alias_map(
        "WITH c AS (SELECT id FROM inner_table) SELECT id FROM c",
    );
    assert_eq!(map.get("c"), Some(&"c".to_string()));
    assert!(!map.contains_key("inner_table"));
    assert_eq!(map.len(), 1);
}

#[test]
fn test_keys_are_lowercased() {
    let map = alias_map("SELECT O.id FROM Orders O");
    assert_eq!(map.get("o"), Some(&"orders".to_string()));
}

#[test]
fn test_resolve_qualified_source() {
    let map = alias_map("SELECT 1 FROM orders o JOIN items i ON o.id = i.order_id");
    let (table, column) = resolve_source(&map, &SourceRef::qualified("i", "sku"));
    assert_eq!(table, "items");
    assert_eq!(column, "sku");
}

#[test]
fn test_resolve_unknown_alias_falls_back_to_raw_text() {
    let map = alias_map("SELECT 1 FROM orders o JOIN items i ON o.id = i.order_id");
    let (table, _) = resolve_source(&map, &SourceRef::qualified("zz", "sku"));
    assert_eq!(table, "zz");
}

#[test]
fn test_resolve_unqualified_single_table_scope() {
    let map = alias_map("SELECT id FROM customers");
    let (table, column) = resolve_source(&map, &SourceRef::simple("id"));
    assert_eq!(table, "customers");
    assert_eq!(column, "id");
}

#[test]
fn test_resolve_unqualified_multi_table_scope_is_unresolved() {
    let map = alias_map("SELECT 1 FROM orders o JOIN items i ON o.id = i.order_id");
    let (table, _) = resolve_source(&map, &SourceRef::simple("id"));
    assert_eq!(table, "");
}
