//! Free-text search and stock comparison filters.
//!
//! A record is visible when it passes both filters of a [`FilterState`].
//! Search is a case-insensitive substring match on one column. The stock
//! filter compares the stock column against a literal such as `>= 5`; an
//! expression whose literal does not parse applies no filter at all.
//! Filtering never reorders records.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::Heuristics,
    dataset::{Dataset, Record},
    numeric::{number_or_zero, parse_number},
    roles::ColumnRoles,
};

/// User-controlled filter inputs. Empty strings disable their stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: String,
    pub stock: String,
}

impl FilterState {
    pub fn new(search: impl Into<String>, stock: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            stock: stock.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.stock.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOperator {
    // Two-character operators first so `>` never shadows `>=`.
    const TOKENS: [(&'static str, ComparisonOperator); 5] = [
        (">=", ComparisonOperator::Ge),
        ("<=", ComparisonOperator::Le),
        (">", ComparisonOperator::Gt),
        ("<", ComparisonOperator::Lt),
        ("=", ComparisonOperator::Eq),
    ];

    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            ComparisonOperator::Eq => left == right,
            ComparisonOperator::Gt => left > right,
            ComparisonOperator::Ge => left >= right,
            ComparisonOperator::Lt => left < right,
            ComparisonOperator::Le => left <= right,
        }
    }
}

/// A parsed stock expression such as `>= 5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockFilter {
    pub operator: Option<ComparisonOperator>,
    pub threshold: f64,
}

impl StockFilter {
    /// Returns `None` when the literal after the operator is not a number,
    /// which callers treat as "no filter".
    pub fn parse(expression: &str) -> Option<Self> {
        let trimmed = expression.trim();
        let (operator, rest) = ComparisonOperator::TOKENS
            .iter()
            .find_map(|(token, op)| trimmed.strip_prefix(*token).map(|rest| (Some(*op), rest)))
            .unwrap_or((None, trimmed));
        let threshold = parse_number(rest.trim())?;
        Some(Self {
            operator,
            threshold,
        })
    }

    /// Without an operator every value passes.
    pub fn matches(&self, raw: &str) -> bool {
        match self.operator {
            Some(op) => op.apply(number_or_zero(raw), self.threshold),
            None => true,
        }
    }
}

/// Column searched by the free-text filter: the configured override when it
/// exists, else the first categorical column, else the first header column.
pub fn search_column<'a>(
    dataset: &'a Dataset,
    roles: &'a ColumnRoles,
    heuristics: &Heuristics,
) -> Option<&'a str> {
    if let Some(configured) = heuristics.search_column.as_deref()
        && let Some(idx) = dataset.column_index(configured)
    {
        return Some(dataset.headers()[idx].as_str());
    }
    roles
        .categorical
        .first()
        .or_else(|| dataset.headers().first())
        .map(String::as_str)
}

/// Records passing both the search and stock stages, in dataset order.
pub fn filter_records<'a>(
    dataset: &'a Dataset,
    roles: &ColumnRoles,
    state: &FilterState,
    heuristics: &Heuristics,
) -> Vec<&'a Record> {
    let needle = state.search.to_lowercase();
    let search_in = if needle.is_empty() {
        None
    } else {
        search_column(dataset, roles, heuristics)
    };

    let stock = if state.stock.is_empty() {
        None
    } else {
        roles.stock_column.as_deref().and_then(|column| {
            let parsed = StockFilter::parse(&state.stock);
            if parsed.is_none() {
                debug!("Ignoring stock filter '{}': no numeric literal", state.stock);
            }
            parsed.map(|filter| (column, filter))
        })
    };

    dataset
        .records()
        .iter()
        .filter(|record| {
            search_in.is_none_or(|column| record.value(column).to_lowercase().contains(&needle))
        })
        .filter(|record| stock.is_none_or(|(column, filter)| filter.matches(record.value(column))))
        .collect()
}
