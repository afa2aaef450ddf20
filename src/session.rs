//! Interactive session state as immutable revisions.
//!
//! A [`Session`] holds the loaded dataset, its column roles, and every user
//! input that shapes the derived views. Each setter returns a new revision and
//! leaves the receiver untouched; the dataset itself sits behind an [`Arc`], so
//! revisions share it and a reader holding an older revision never observes a
//! later load. [`Session::view()`] recomputes every derived value from scratch.

use std::sync::Arc;

use log::{debug, info};

use crate::{
    chart::{ChartPoint, project},
    config::Heuristics,
    dataset::{Dataset, ParseError, ParseOptions, Record, parse},
    filter::{FilterState, filter_records},
    metrics::{AggregateSummary, aggregate},
    roles::{ColumnRoles, classify},
    sort::{SortDirective, sort_records},
};

#[derive(Debug, Clone, Default)]
pub struct Session {
    revision: u64,
    heuristics: Arc<Heuristics>,
    dataset: Option<Arc<Dataset>>,
    roles: ColumnRoles,
    selected_column: Option<String>,
    filters: FilterState,
    sort: Option<SortDirective>,
}

/// Everything derived from one revision.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub dataset: &'a Dataset,
    pub roles: &'a ColumnRoles,
    pub selected_column: Option<&'a str>,
    /// Filtered records in upload order; summary and chart read these.
    pub visible: Vec<&'a Record>,
    /// `visible` reordered by the sort directive, for row listings.
    pub rows: Vec<&'a Record>,
    pub summary: AggregateSummary,
    pub chart: Vec<ChartPoint>,
}

impl Session {
    pub fn new(heuristics: Heuristics) -> Self {
        Self {
            heuristics: Arc::new(heuristics),
            ..Self::default()
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    pub fn selected_column(&self) -> Option<&str> {
        self.selected_column.as_deref()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortDirective> {
        self.sort.as_ref()
    }

    /// Parses `text` into a fresh revision that replaces the dataset, clears
    /// the filters and sort, and keeps the selected column only while it is
    /// still numeric. On error the caller keeps its current revision.
    pub fn load(&self, text: &str, options: ParseOptions) -> Result<Self, ParseError> {
        let dataset = parse(text, options)?;
        Ok(self.replace_dataset(dataset))
    }

    pub fn replace_dataset(&self, dataset: Dataset) -> Self {
        let roles = classify(&dataset, &self.heuristics);
        let selected_column = roles.resolve_chart_column(self.selected_column.as_deref());
        info!(
            "Loaded {} record(s) with {} column(s); charting {:?}",
            dataset.len(),
            dataset.headers().len(),
            selected_column
        );
        Self {
            revision: self.revision + 1,
            heuristics: Arc::clone(&self.heuristics),
            dataset: Some(Arc::new(dataset)),
            roles,
            selected_column,
            filters: FilterState::default(),
            sort: None,
        }
    }

    /// Selecting a non-numeric or unknown column falls back to the first
    /// numeric column.
    pub fn with_selected_column(&self, column: Option<&str>) -> Self {
        let selected_column = self.roles.resolve_chart_column(column);
        if column.is_some() && selected_column.as_deref() != column {
            debug!("Column {column:?} is not numeric; charting {selected_column:?}");
        }
        self.next(|next| next.selected_column = selected_column)
    }

    pub fn with_search(&self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.next(|next| next.filters.search = search)
    }

    pub fn with_stock_filter(&self, expression: impl Into<String>) -> Self {
        let expression = expression.into();
        self.next(|next| next.filters.stock = expression)
    }

    pub fn with_filters(&self, filters: FilterState) -> Self {
        self.next(|next| next.filters = filters)
    }

    pub fn with_sort(&self, sort: Option<SortDirective>) -> Self {
        self.next(|next| next.sort = sort)
    }

    /// Derives the visible rows, summary, and chart for this revision.
    /// Returns `None` before any dataset has been loaded.
    pub fn view(&self) -> Option<DashboardView<'_>> {
        let dataset = self.dataset.as_deref()?;
        let heuristics = self.heuristics.as_ref();
        let visible = filter_records(dataset, &self.roles, &self.filters, heuristics);
        let mut rows = visible.clone();
        if let Some(directive) = &self.sort {
            sort_records(&mut rows, directive);
        }
        let selected_column = self.selected_column.as_deref();
        let summary = aggregate(dataset, &visible, selected_column, heuristics);
        let chart = project(
            &visible,
            selected_column,
            self.roles.variant_column.as_deref(),
            &heuristics.missing_label,
        );
        debug!(
            "Revision {}: {} of {} record(s) visible",
            self.revision,
            visible.len(),
            dataset.len()
        );
        Some(DashboardView {
            dataset,
            roles: &self.roles,
            selected_column,
            visible,
            rows,
            summary,
            chart,
        })
    }

    fn next(&self, update: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        next.revision += 1;
        update(&mut next);
        next
    }
}
