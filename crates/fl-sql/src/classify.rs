//! Transformation classification for output-column expressions

use crate::columns::any_expr;
use crate::object_name_to_string;
use serde::{Deserialize, Serialize};
use sqlparser::ast::{Expr, SelectItem};

/// How an output column derives from its sources.
///
/// Classification is a priority chain: aggregation is checked before
/// function calls, which are checked before arithmetic, because a single
/// expression can match several categories structurally (`SUM(a + b)` is
/// `aggregated`, not `calculated`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationKind {
    /// Bare column reference, output name unchanged
    Direct,
    /// Bare column reference under a different output alias
    Renamed,
    /// Contains an aggregate function anywhere in the subtree
    Aggregated,
    /// Contains a CASE/WHEN construct
    CaseExpression,
    /// Contains a non-aggregate function call
    Function,
    /// Binary/arithmetic or comparison operator, no function or CASE
    Calculated,
    /// Fallback: literals, casts without named functions, anything else
    Transformed,
}

impl TransformationKind {
    /// Whether the column value is altered on the way through (anything
    /// other than a direct copy or a rename).
    pub fn is_transformed(self) -> bool {
        !matches!(self, TransformationKind::Direct | TransformationKind::Renamed)
    }
}

impl std::fmt::Display for TransformationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            TransformationKind::Direct => "direct",
            TransformationKind::Renamed => "renamed",
            TransformationKind::Aggregated => "aggregated",
            TransformationKind::CaseExpression => "case_expression",
            TransformationKind::Function => "function",
            TransformationKind::Calculated => "calculated",
            TransformationKind::Transformed => "transformed",
        };
        write!(f, "{}", tag)
    }
}

/// Aggregate function names, lowercased.
///
/// sqlparser does not discriminate aggregates structurally, so membership
/// is by name. Includes the ANSI set plus common ClickHouse/Snowflake
/// aggregates.
const AGGREGATE_FUNCTIONS: &[&str] = &[
    "any_value",
    "approx_count_distinct",
    "approx_distinct",
    "argmax",
    "argmin",
    "array_agg",
    "avg",
    "bit_and",
    "bit_or",
    "bool_and",
    "bool_or",
    "corr",
    "count",
    "covar_pop",
    "covar_samp",
    "group_concat",
    "grouparray",
    "groupuniqarray",
    "listagg",
    "max",
    "median",
    "min",
    "percentile_cont",
    "percentile_disc",
    "stddev",
    "stddev_pop",
    "stddev_samp",
    "string_agg",
    "sum",
    "uniq",
    "uniqexact",
    "var_pop",
    "var_samp",
    "variance",
];

fn is_aggregate_name(name: &str) -> bool {
    AGGREGATE_FUNCTIONS
        .binary_search(&name.to_lowercase().as_str())
        .is_ok()
}

/// Classify one SELECT-list item.
///
/// Pure function of the expression structure; the direct/renamed split
/// compares the output alias against the referenced column name.
pub fn classify(item: &SelectItem) -> TransformationKind {
    match item {
        SelectItem::UnnamedExpr(expr) => match expr {
            Expr::Identifier(_) | Expr::CompoundIdentifier(_) => TransformationKind::Direct,
            other => classify_expr(other),
        },
        SelectItem::ExprWithAlias { expr, alias } => {
            let bare_column = match expr {
                Expr::Identifier(ident) => Some(&ident.value),
                Expr::CompoundIdentifier(idents) => idents.last().map(|i| &i.value),
                _ => None,
            };
            match bare_column {
                Some(column) if alias.value.eq_ignore_ascii_case(column) => {
                    TransformationKind::Direct
                }
                Some(_) => TransformationKind::Renamed,
                None => classify_expr(expr),
            }
        }
        // Wildcards pass columns through untouched.
        SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(..) => TransformationKind::Direct,
    }
}

/// Classify an expression that is not a bare column reference.
pub fn classify_expr(expr: &Expr) -> TransformationKind {
    if any_expr(expr, |e| match e {
        Expr::Function(func) => is_aggregate_name(&object_name_to_string(&func.name)),
        _ => false,
    }) {
        return TransformationKind::Aggregated;
    }

    if any_expr(expr, |e| matches!(e, Expr::Case { .. })) {
        return TransformationKind::CaseExpression;
    }

    if any_expr(expr, |e| matches!(e, Expr::Function(_))) {
        return TransformationKind::Function;
    }

    if any_expr(expr, |e| matches!(e, Expr::BinaryOp { .. })) {
        return TransformationKind::Calculated;
    }

    TransformationKind::Transformed
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
