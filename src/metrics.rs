use serde::Serialize;

use crate::{
    config::Heuristics,
    dataset::{Dataset, Record},
    numeric::{format_brl, format_units, number_or_zero, parse_brl_currency},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total: f64,
    pub mean: f64,
    pub monetary_total: f64,
    pub record_count: usize,
    /// Share of the configured product goal, in whole percent.
    pub goal_progress: u64,
}

impl AggregateSummary {
    /// Label/value pairs for plain-text output.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        vec![
            vec!["total".to_string(), format_units(self.total)],
            vec!["mean".to_string(), format_units(self.mean)],
            vec!["monetary_total".to_string(), format_brl(self.monetary_total)],
            vec!["record_count".to_string(), self.record_count.to_string()],
            vec!["goal_progress".to_string(), format!("{}%", self.goal_progress)],
        ]
    }
}

/// Summarises the visible records for `selected_column` and the monetary
/// column of the full dataset.
pub fn aggregate(
    dataset: &Dataset,
    visible: &[&Record],
    selected_column: Option<&str>,
    heuristics: &Heuristics,
) -> AggregateSummary {
    let total = selected_column
        .map(|column| {
            visible
                .iter()
                .map(|record| number_or_zero(record.value(column)))
                .sum::<f64>()
        })
        .unwrap_or(0.0);
    let record_count = visible.len();
    let mean = if record_count > 0 {
        total / record_count as f64
    } else {
        0.0
    };
    AggregateSummary {
        total,
        mean,
        monetary_total: monetary_total(dataset, heuristics),
        record_count,
        goal_progress: goal_progress(record_count, heuristics.product_goal),
    }
}

/// Sum of the first monetary column across every record, or `0.0` when the
/// dataset has no such column.
pub fn monetary_total(dataset: &Dataset, heuristics: &Heuristics) -> f64 {
    let Some(column) = monetary_column(dataset, heuristics) else {
        return 0.0;
    };
    dataset
        .records()
        .iter()
        .map(|record| parse_brl_currency(record.value(column)))
        .sum()
}

pub fn monetary_column<'a>(dataset: &'a Dataset, heuristics: &Heuristics) -> Option<&'a str> {
    dataset
        .headers()
        .iter()
        .find(|column| heuristics.is_monetary_name(column))
        .map(String::as_str)
}

fn goal_progress(record_count: usize, goal: u32) -> u64 {
    if goal == 0 {
        return 0;
    }
    (record_count as u64 * 100) / u64::from(goal)
}
