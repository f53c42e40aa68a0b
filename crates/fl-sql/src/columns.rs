//! Column reference extraction from expression subtrees

use serde::{Deserialize, Serialize};
use sqlparser::ast::{visit_expressions, Expr};
use std::ops::ControlFlow;

/// A column reference found in an expression, before alias resolution.
///
/// `table` is the qualifying alias exactly as written (`o` in `o.amount`),
/// or `None` for an unqualified reference. Column names are lowercased;
/// identifiers are matched case-insensitively throughout the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRef {
    /// Qualifying table alias, if any
    pub table: Option<String>,
    /// Column name, lowercased
    pub column: String,
}

impl SourceRef {
    /// Create an unqualified column reference
    pub fn simple(column: &str) -> Self {
        Self {
            table: None,
            column: column.to_lowercase(),
        }
    }

    /// Create a qualified column reference
    pub fn qualified(table: &str, column: &str) -> Self {
        Self {
            table: Some(table.to_lowercase()),
            column: column.to_lowercase(),
        }
    }
}

/// Collect every leaf column reference in an expression subtree.
///
/// Visits the full tree (function arguments, CASE arms, nested subqueries)
/// and preserves encounter order. Wildcards and literals are not column
/// references and are skipped.
pub fn extract_column_refs(expr: &Expr) -> Vec<SourceRef> {
    let mut refs = Vec::new();

    let _ = visit_expressions(expr, |e: &Expr| {
        match e {
            Expr::Identifier(ident) => {
                refs.push(SourceRef::simple(&ident.value));
            }
            Expr::CompoundIdentifier(idents) => {
                if let Some(column) = idents.last() {
                    if idents.len() >= 2 {
                        let table = idents[..idents.len() - 1]
                            .iter()
                            .map(|i| i.value.clone())
                            .collect::<Vec<_>>()
                            .join(".");
                        refs.push(SourceRef::qualified(&table, &column.value));
                    } else {
                        refs.push(SourceRef::simple(&column.value));
                    }
                }
            }
            _ => {}
        }
        ControlFlow::<()>::Continue(())
    });

    refs
}

/// True if any expression in the subtree satisfies the predicate.
pub(crate) fn any_expr(expr: &Expr, mut pred: impl FnMut(&Expr) -> bool) -> bool {
    visit_expressions(expr, |e: &Expr| {
        if pred(e) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

#[cfg(test)]
#[path = "columns_test.rs"]
mod tests;
