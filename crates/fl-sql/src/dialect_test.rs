use super::*;

#[test]
fn test_dialect_names() {
    assert_eq!(ClickHouseDialect::new().name(), "clickhouse");
    assert_eq!(GenericDialect::new().name(), "generic");
    assert_eq!(PostgresDialect::new().name(), "postgres");
    assert_eq!(SnowflakeDialect::new().name(), "snowflake");
    assert_eq!(BigQueryDialect::new().name(), "bigquery");
    assert_eq!(DuckDbDialect::new().name(), "duckdb");
}

#[test]
fn test_parse_valid_sql() {
    let stmts = GenericDialect::new().parse("SELECT 1").unwrap();
    assert_eq!(stmts.len(), 1);
}

#[test]
fn test_parse_error_is_a_value() {
    let err = GenericDialect::new().parse("SELEC id FROM t").unwrap_err();
    match err {
        SqlError::ParseError { message, .. } => {
            assert!(!message.is_empty());
        }
        other => panic!("expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_parse_location_extraction() {
    let (line, column) = parse_location_from_error("Expected: something at Line: 3, Column: 14");
    assert_eq!(line, 3);
    assert_eq!(column, 14);
}

#[test]
fn test_parse_location_missing() {
    assert_eq!(parse_location_from_error("no location here"), (0, 0));
}
