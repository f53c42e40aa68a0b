use super::*;

#[test]
fn test_default_dialect_is_clickhouse() {
    assert_eq!(SqlParser::default().dialect_name(), "clickhouse");
}

#[test]
fn test_from_dialect_name() {
    for name in ["clickhouse", "generic", "postgres", "snowflake", "bigquery", "duckdb"] {
        let parser = SqlParser::from_dialect_name(name).unwrap();
        assert_eq!(parser.dialect_name(), name);
    }
}

#[test]
fn test_from_dialect_name_aliases() {
    assert_eq!(
        SqlParser::from_dialect_name("PostgreSQL").unwrap().dialect_name(),
        "postgres"
    );
    assert_eq!(
        SqlParser::from_dialect_name("ansi").unwrap().dialect_name(),
        "generic"
    );
}

#[test]
fn test_unknown_dialect() {
    let err = SqlParser::from_dialect_name("oracle").unwrap_err();
    assert!(matches!(err, SqlError::UnknownDialect(_)));
    assert!(err.to_string().contains("[S003]"));
}

#[test]
fn test_empty_sql() {
    let parser = SqlParser::generic();
    assert!(matches!(parser.parse(""), Err(SqlError::EmptySql)));
    assert!(matches!(parser.parse("   \n  "), Err(SqlError::EmptySql)));
}

#[test]
fn test_parse_query() {
    let parser = SqlParser::generic();
    let query = parser.parse_query("SELECT id FROM users").unwrap();
    assert!(query.with.is_none());
}

#[test]
fn test_parse_query_rejects_non_query() {
    let parser = SqlParser::generic();
    let err = parser.parse_query("INSERT INTO t VALUES (1)").unwrap_err();
    match err {
        SqlError::UnsupportedStatement(kind) => assert_eq!(kind, "INSERT"),
        other => panic!("expected UnsupportedStatement, got {:?}", other),
    }
}

#[test]
fn test_parse_failure_does_not_panic() {
    let parser = SqlParser::generic();
    assert!(parser.parse("SELECT FROM WHERE").is_err());
}
