//! SQL parser wrapper

use crate::dialect::{
    BigQueryDialect, ClickHouseDialect, DuckDbDialect, GenericDialect, PostgresDialect,
    SnowflakeDialect, SqlDialect,
};
use crate::error::{SqlError, SqlResult};
use sqlparser::ast::{Query, Statement};

/// SQL parser that wraps sqlparser-rs with dialect support.
///
/// Parse failures are returned as values, never panics, so one malformed
/// statement cannot abort a whole extraction run.
pub struct SqlParser {
    dialect: Box<dyn SqlDialect>,
}

impl std::fmt::Debug for SqlParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlParser")
            .field("dialect", &self.dialect.name())
            .finish()
    }
}

impl SqlParser {
    /// Create a new parser with ClickHouse dialect
    pub fn clickhouse() -> Self {
        Self {
            dialect: Box::new(ClickHouseDialect::new()),
        }
    }

    /// Create a new parser with generic ANSI dialect
    pub fn generic() -> Self {
        Self {
            dialect: Box::new(GenericDialect::new()),
        }
    }

    /// Create a parser from a dialect name.
    ///
    /// Unknown names are a configuration error, reported once at startup
    /// rather than per statement.
    pub fn from_dialect_name(name: &str) -> SqlResult<Self> {
        let dialect: Box<dyn SqlDialect> = match name.to_lowercase().as_str() {
            "clickhouse" => Box::new(ClickHouseDialect::new()),
            "generic" | "ansi" => Box::new(GenericDialect::new()),
            "postgres" | "postgresql" => Box::new(PostgresDialect::new()),
            "snowflake" => Box::new(SnowflakeDialect::new()),
            "bigquery" => Box::new(BigQueryDialect::new()),
            "duckdb" => Box::new(DuckDbDialect::new()),
            _ => return Err(SqlError::UnknownDialect(name.to_string())),
        };
        Ok(Self { dialect })
    }

    /// Parse SQL into AST statements
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<Statement>> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(SqlError::EmptySql);
        }

        self.dialect.parse(sql)
    }

    /// Parse SQL and return the first statement
    pub fn parse_single(&self, sql: &str) -> SqlResult<Statement> {
        let stmts = self.parse(sql)?;
        stmts.into_iter().next().ok_or(SqlError::EmptySql)
    }

    /// Parse SQL and return the first statement as a query.
    ///
    /// Compiled transformation models are expected to be plain SELECTs;
    /// anything else is reported as an unsupported statement.
    pub fn parse_query(&self, sql: &str) -> SqlResult<Box<Query>> {
        match self.parse_single(sql)? {
            Statement::Query(query) => Ok(query),
            other => Err(SqlError::UnsupportedStatement(
                statement_kind(&other).to_string(),
            )),
        }
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::clickhouse()
    }
}

/// Short human-readable tag for a statement variant, used in diagnostics.
fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Insert(_) => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::CreateTable(_) => "CREATE TABLE",
        Statement::CreateView { .. } => "CREATE VIEW",
        Statement::Drop { .. } => "DROP",
        _ => "non-query",
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
