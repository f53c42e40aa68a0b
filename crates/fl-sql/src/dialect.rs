//! SQL dialect abstraction

use sqlparser::ast::Statement;
use sqlparser::dialect::{
    BigQueryDialect as SqlParserBigQuery, ClickHouseDialect as SqlParserClickHouse, Dialect,
    DuckDbDialect as SqlParserDuckDb, GenericDialect as SqlParserGeneric,
    PostgreSqlDialect as SqlParserPostgres, SnowflakeDialect as SqlParserSnowflake,
};
use sqlparser::parser::Parser;

use crate::error::{SqlError, SqlResult};

/// Trait for SQL dialect implementations
pub trait SqlDialect: Send + Sync {
    /// Get the underlying sqlparser dialect
    fn parser_dialect(&self) -> &dyn Dialect;

    /// Parse SQL into AST statements
    fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        Parser::parse_sql(self.parser_dialect(), sql).map_err(|e| {
            let msg = e.to_string();
            // Extract line/column from error message (format: "... at Line: X, Column: Y")
            let (line, column) = parse_location_from_error(&msg);
            SqlError::ParseError {
                message: msg,
                line,
                column,
            }
        })
    }

    /// Get the dialect name
    fn name(&self) -> &'static str;
}

/// Parse line and column from a sqlparser error message.
///
/// sqlparser's `ParserError` is a simple string wrapper with no structured
/// location data, so we extract "Line: N, Column: M" from the message text.
fn parse_location_from_error(msg: &str) -> (usize, usize) {
    let Some(line_idx) = msg.find("Line: ") else {
        return (0, 0);
    };
    let line_start = line_idx + 6;
    let Some(comma_idx) = msg[line_start..].find(',') else {
        return (0, 0);
    };
    let Ok(line) = msg[line_start..line_start + comma_idx]
        .trim()
        .parse::<usize>()
    else {
        return (0, 0);
    };
    let Some(col_idx) = msg.find("Column: ") else {
        return (0, 0);
    };
    let col_start = col_idx + 8;
    let col_end = msg[col_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| col_start + i)
        .unwrap_or(msg.len());
    let Ok(column) = msg[col_start..col_end].trim().parse::<usize>() else {
        return (0, 0);
    };
    (line, column)
}

macro_rules! dialect_impl {
    ($(#[$doc:meta])* $wrapper:ident, $inner:ident, $name:literal) => {
        $(#[$doc])*
        pub struct $wrapper {
            dialect: $inner,
        }

        impl $wrapper {
            /// Create a new dialect instance
            pub fn new() -> Self {
                Self { dialect: $inner {} }
            }
        }

        impl Default for $wrapper {
            fn default() -> Self {
                Self::new()
            }
        }

        impl SqlDialect for $wrapper {
            fn parser_dialect(&self) -> &dyn Dialect {
                &self.dialect
            }

            fn name(&self) -> &'static str {
                $name
            }
        }
    };
}

dialect_impl!(
    /// ClickHouse SQL dialect
    ClickHouseDialect,
    SqlParserClickHouse,
    "clickhouse"
);
dialect_impl!(
    /// Generic ANSI SQL dialect
    GenericDialect,
    SqlParserGeneric,
    "generic"
);
dialect_impl!(
    /// PostgreSQL dialect
    PostgresDialect,
    SqlParserPostgres,
    "postgres"
);
dialect_impl!(
    /// Snowflake SQL dialect
    SnowflakeDialect,
    SqlParserSnowflake,
    "snowflake"
);
dialect_impl!(
    /// BigQuery SQL dialect
    BigQueryDialect,
    SqlParserBigQuery,
    "bigquery"
);
dialect_impl!(
    /// DuckDB SQL dialect
    DuckDbDialect,
    SqlParserDuckDb,
    "duckdb"
);

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
