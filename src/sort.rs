use std::{cmp::Ordering, fmt};

use anyhow::{Result, anyhow};

use crate::{dataset::Record, numeric::parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Row-view ordering of the form `column[:asc|desc]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub column: String,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn parse(spec: &str) -> Result<Self> {
        let trimmed = spec.trim();
        let (column, direction) = match trimmed.rsplit_once(':') {
            Some((column, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => return Err(anyhow!("Unknown sort direction '{other}'")),
                };
                (column.trim(), direction)
            }
            None => (trimmed, SortDirection::Asc),
        };
        if column.is_empty() {
            return Err(anyhow!("Sort directive '{spec}' is missing a column"));
        }
        Ok(Self {
            column: column.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{dir}", self.column)
    }
}

/// Stable in-place sort of `records` by `directive`.
///
/// Two numeric cells compare as numbers, anything else compares as
/// lowercase text; numbers order before text.
pub fn sort_records(records: &mut [&Record], directive: &SortDirective) {
    records.sort_by(|left, right| {
        let ordering = compare_cells(
            left.value(&directive.column),
            right.value(&directive.column),
        );
        match directive.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_cells(left: &str, right: &str) -> Ordering {
    let numeric = |raw: &str| (!raw.is_empty()).then(|| parse_number(raw)).flatten();
    match (numeric(left), numeric(right)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => left.to_lowercase().cmp(&right.to_lowercase()),
    }
}
