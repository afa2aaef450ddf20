//! Column classification.
//!
//! [`classify()`] partitions a dataset's header into numeric and categorical
//! columns and picks the image, variant, and stock columns. Header order
//! breaks every tie.

use log::debug;
use serde::Serialize;

use crate::{config::Heuristics, dataset::Dataset, numeric::is_numeric_cell};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub image_column: Option<String>,
    pub variant_column: Option<String>,
    pub stock_column: Option<String>,
}

impl ColumnRoles {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|name| name == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|name| name == column)
    }

    /// Column the chart should plot: `preferred` while it is still numeric,
    /// otherwise the first numeric column.
    pub fn resolve_chart_column(&self, preferred: Option<&str>) -> Option<String> {
        preferred
            .filter(|column| self.is_numeric(column))
            .map(str::to_string)
            .or_else(|| self.numeric.first().cloned())
    }

    /// Role labels for `column`, in display order.
    pub fn labels_for(&self, column: &str) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.is_numeric(column) {
            labels.push("numeric");
        }
        if self.is_categorical(column) {
            labels.push("categorical");
        }
        if self.image_column.as_deref() == Some(column) {
            labels.push("image");
        }
        if self.variant_column.as_deref() == Some(column) {
            labels.push("variant");
        }
        if self.stock_column.as_deref() == Some(column) {
            labels.push("stock");
        }
        labels
    }
}

pub fn classify(dataset: &Dataset, heuristics: &Heuristics) -> ColumnRoles {
    if dataset.is_empty() {
        return ColumnRoles::default();
    }

    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for (idx, column) in dataset.headers().iter().enumerate() {
        if column_is_numeric(dataset, idx) {
            numeric.push(column.clone());
        } else {
            categorical.push(column.clone());
        }
    }

    let image_column = dataset
        .headers()
        .iter()
        .enumerate()
        .find(|(idx, _)| {
            dataset
                .records()
                .iter()
                .any(|record| heuristics.is_image_reference(&record.values()[*idx]))
        })
        .map(|(_, column)| column.clone());

    let variant_column = dataset
        .headers()
        .iter()
        .find(|column| heuristics.is_variant_name(column))
        .or_else(|| categorical.first())
        .cloned();

    let stock_column = dataset
        .headers()
        .iter()
        .find(|column| heuristics.is_stock_name(column))
        .or_else(|| numeric.first())
        .cloned();

    let roles = ColumnRoles {
        numeric,
        categorical,
        image_column,
        variant_column,
        stock_column,
    };
    debug!("Classified columns: {roles:?}");
    roles
}

// Stops at the first cell that is empty or lacks a numeric prefix.
fn column_is_numeric(dataset: &Dataset, idx: usize) -> bool {
    dataset
        .records()
        .iter()
        .all(|record| is_numeric_cell(&record.values()[idx]))
}
