use serde::Serialize;

use crate::{dataset::Record, numeric::number_or_zero};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// One point per visible record, in the same order.
///
/// Labels come from `variant_column`; a missing column or empty cell uses
/// `missing_label`. Values read `value_column` with unreadable cells as zero,
/// and every value is zero when no column is selected.
pub fn project(
    visible: &[&Record],
    value_column: Option<&str>,
    variant_column: Option<&str>,
    missing_label: &str,
) -> Vec<ChartPoint> {
    visible
        .iter()
        .map(|record| {
            let label = variant_column
                .map(|column| record.value(column))
                .filter(|label| !label.is_empty())
                .unwrap_or(missing_label);
            ChartPoint {
                label: label.to_string(),
                value: value_column
                    .map(|column| number_or_zero(record.value(column)))
                    .unwrap_or(0.0),
            }
        })
        .collect()
}

pub fn display_rows(points: &[ChartPoint]) -> Vec<Vec<String>> {
    points
        .iter()
        .map(|point| vec![point.label.clone(), point.value.to_string()])
        .collect()
}
