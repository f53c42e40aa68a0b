use super::*;
use crate::parser::SqlParser;
use sqlparser::ast::Query;

fn parse(sql: &str) -> Box<Query> {
    SqlParser::generic().parse_query(sql).unwrap()
}

fn edges_for(
    query: &Query,
    node_id: &str,
    column: &str,
    deps: &[UpstreamRef],
) -> (Vec<ColumnEdge>, Vec<Diagnostic>) {
    let lineage = StatementLineage::new(query);
    let mut edges = Vec::new();
    let mut diagnostics = Vec::new();
    lineage.column_edges(node_id, column, deps, &mut edges, &mut diagnostics);
    (edges, diagnostics)
}

#[test]
fn test_direct_copy_single_dependency() {
    let query = parse("SELECT id, name FROM source_customers");
    let deps = vec![UpstreamRef::new("source.proj.raw.customers", "customers")];

    let (edges, diagnostics) = edges_for(&query, "model.proj.stg_customers", "id", &deps);

    assert!(diagnostics.is_empty());
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "source.proj.raw.customers.id");
    assert_eq!(edges[0].target, "model.proj.stg_customers.id");
    assert_eq!(edges[0].transformation, "id");
    assert_eq!(edges[0].kind, TransformationKind::Direct);
}

#[test]
fn test_trace_through_cte() {
    let query = parse(
        "WITH c AS (SELECT id, UPPER(name) AS upper_name FROM customers) \
         SELECT id, upper_name FROM c",
    );
    // Two dependencies so the single-dependency shortcut does not apply
    // and the reference is traced through the CTE map.
    let deps = vec![
        UpstreamRef::new("model.proj.customers", "customers"),
        UpstreamRef::new("model.proj.orders", "orders"),
    ];

    let (edges, diagnostics) = edges_for(&query, "model.proj.enriched", "upper_name", &deps);

    assert!(diagnostics.is_empty());
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "model.proj.customers.name");
    assert_eq!(edges[0].target, "model.proj.enriched.upper_name");
}

#[test]
fn test_aggregate_over_join() {
    let query = parse(
        "SELECT a.id, SUM(b.amount) AS total FROM orders a \
         JOIN line_items b ON a.id = b.order_id GROUP BY a.id",
    );
    let deps = vec![
        UpstreamRef::new("model.proj.orders", "orders"),
        UpstreamRef::new("model.proj.line_items", "line_items"),
    ];

    let (edges, diagnostics) = edges_for(&query, "model.proj.order_totals", "total", &deps);

    assert!(diagnostics.is_empty());
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "model.proj.line_items.amount");
    assert_eq!(edges[0].transformation, "SUM(b.amount)");
    assert_eq!(edges[0].kind, TransformationKind::Aggregated);
}

#[test]
fn test_suffix_binding_for_schema_qualified_tables() {
    let query = parse("SELECT o.id FROM analytics.stg_orders o JOIN analytics.stg_items i ON o.id = i.order_id");
    let deps = vec![
        UpstreamRef::new("model.proj.stg_orders", "stg_orders"),
        UpstreamRef::new("model.proj.stg_items", "stg_items"),
    ];

    let (edges, diagnostics) = edges_for(&query, "model.proj.m", "id", &deps);

    assert!(diagnostics.is_empty());
    assert_eq!(edges[0].source, "model.proj.stg_orders.id");
}

#[test]
fn test_same_name_fallback_for_wildcard() {
    let query = parse("SELECT * FROM base_table");
    let deps = vec![
        UpstreamRef::new("model.proj.base_table", "base_table")
            .with_columns(vec!["email".to_string(), "id".to_string()]),
    ];

    let (edges, diagnostics) = edges_for(&query, "model.proj.copy", "email", &deps);

    assert!(diagnostics.is_empty());
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, "model.proj.base_table.email");
    assert_eq!(edges[0].transformation, "");
    assert_eq!(edges[0].kind, TransformationKind::Direct);
}

#[test]
fn test_fallback_misses_when_dependency_lacks_column() {
    let query = parse("SELECT * FROM base_table");
    let deps = vec![
        UpstreamRef::new("model.proj.base_table", "base_table")
            .with_columns(vec!["id".to_string()]),
    ];

    let (edges, _) = edges_for(&query, "model.proj.copy", "email", &deps);
    assert!(edges.is_empty());
}

#[test]
fn test_unresolved_reference_is_a_diagnostic_not_an_error() {
    let query = parse(
        "SELECT q.val FROM mystery_table q JOIN second_table s ON q.id = s.id",
    );
    let deps = vec![
        UpstreamRef::new("model.proj.orders", "orders"),
        UpstreamRef::new("model.proj.items", "items"),
    ];

    let (edges, diagnostics) = edges_for(&query, "model.proj.m", "val", &deps);

    assert!(edges.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].stage, DiagnosticStage::Bind);
    assert_eq!(diagnostics[0].column.as_deref(), Some("val"));
}

#[test]
fn test_binding_ties_break_by_declaration_order() {
    let query = parse("SELECT u.id FROM users u JOIN extra_t e ON u.id = e.id");
    // Both names are contained in "users"; the first declared wins.
    let deps = vec![
        UpstreamRef::new("model.proj.users", "users"),
        UpstreamRef::new("model.proj.power_users", "power_users"),
    ];

    let (edges, _) = edges_for(&query, "model.proj.m", "id", &deps);
    assert_eq!(edges[0].source, "model.proj.users.id");
}

#[test]
fn test_fan_in_emits_multiple_edges() {
    let query = parse(
        "SELECT o.amount + i.fee AS charged FROM orders o JOIN invoices i ON o.id = i.order_id",
    );
    let deps = vec![
        UpstreamRef::new("model.proj.orders", "orders"),
        UpstreamRef::new("model.proj.invoices", "invoices"),
    ];

    let (edges, diagnostics) = edges_for(&query, "model.proj.m", "charged", &deps);

    assert!(diagnostics.is_empty());
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].source, "model.proj.orders.amount");
    assert_eq!(edges[1].source, "model.proj.invoices.fee");
    assert!(edges.iter().all(|e| e.kind == TransformationKind::Calculated));
}

#[test]
fn test_emission_is_idempotent_and_order_stable() {
    let query = parse(
        "WITH c AS (SELECT id, UPPER(name) AS upper_name FROM customers) \
         SELECT id, upper_name FROM c",
    );
    let deps = vec![
        UpstreamRef::new("model.proj.customers", "customers"),
        UpstreamRef::new("model.proj.orders", "orders"),
    ];

    let first = edges_for(&query, "model.proj.m", "upper_name", &deps);
    let second = edges_for(&query, "model.proj.m", "upper_name", &deps);
    assert_eq!(first, second);
}

#[test]
fn test_output_columns() {
    let query = parse("SELECT id, name AS customer_name, price * 2 FROM t");
    let lineage = StatementLineage::new(&query);

    let (columns, has_wildcard) = lineage.output_columns();
    assert_eq!(columns, vec!["id".to_string(), "customer_name".to_string()]);
    assert!(!has_wildcard);
}

#[test]
fn test_output_columns_wildcard_flag() {
    let query = parse("SELECT * FROM t");
    let lineage = StatementLineage::new(&query);
    let (columns, has_wildcard) = lineage.output_columns();
    assert!(columns.is_empty());
    assert!(has_wildcard);
}

#[test]
fn test_column_definition() {
    let query = parse(
        "SELECT a.id, SUM(b.amount) AS total FROM orders a \
         JOIN line_items b ON a.id = b.order_id GROUP BY a.id",
    );
    let lineage = StatementLineage::new(&query);

    let def = lineage.column_definition("total").unwrap();
    assert_eq!(def.definition, "SUM(b.amount)");
    assert_eq!(def.kind, TransformationKind::Aggregated);
    assert_eq!(def.source_columns, vec!["amount".to_string()]);

    assert!(lineage.column_definition("missing").is_none());
}

#[test]
fn test_bind_upstream_rules() {
    let deps = vec![
        UpstreamRef::new("model.proj.stg_orders", "stg_orders"),
        UpstreamRef::new("source.proj.raw.orders", "orders"),
    ];

    // Suffix match on the first declared dependency.
    let bound = bind_upstream("analytics.stg_orders", &deps).unwrap();
    assert_eq!(bound.unique_id, "model.proj.stg_orders");

    // Containment fallback.
    let bound = bind_upstream("orders_snapshot", &deps).unwrap();
    assert_eq!(bound.unique_id, "source.proj.raw.orders");

    assert!(bind_upstream("customers", &deps).is_none());
    assert!(bind_upstream("", &deps).is_none());
}
