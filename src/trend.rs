use crate::models::{Dimension, MonthRow, Slice, Summary, Weakest};

pub const NO_DIMENSION: &str = "N/A";

/// Overall score and weakest dimension for one month.
///
/// Ties on the minimum go to the dimension registered first, whatever the
/// order of the row's cells. Cells for keys outside `dims` rank after them.
pub fn summarize(row: &MonthRow, dims: &[Dimension]) -> Summary {
    if row.values.is_empty() {
        return Summary {
            overall: 0,
            weakest: Weakest {
                dimension: NO_DIMENSION.to_string(),
                value: 0.0,
            },
        };
    }

    let total: f64 = row.values.iter().map(|cell| cell.value).sum();
    let mean = total / row.values.len() as f64;

    let registered = dims.iter().filter_map(|dimension| {
        row.value(&dimension.key)
            .map(|value| (dimension.label.as_str(), value))
    });
    let unregistered = row
        .values
        .iter()
        .filter(|cell| !dims.iter().any(|dimension| dimension.key == cell.key))
        .map(|cell| (cell.key.as_str(), cell.value));

    let mut weakest: Option<(&str, f64)> = None;
    for (label, value) in registered.chain(unregistered) {
        match weakest {
            Some((_, lowest)) if value >= lowest => {}
            _ => weakest = Some((label, value)),
        }
    }
    let (label, value) = weakest.unwrap_or((NO_DIMENSION, 0.0));

    Summary {
        overall: round_half_up(mean),
        weakest: Weakest {
            dimension: label.to_string(),
            value,
        },
    }
}

pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Per-dimension slices for a pie or legend.
pub fn breakdown(row: &MonthRow, dims: &[Dimension]) -> Vec<Slice> {
    dims.iter()
        .map(|dimension| Slice {
            label: dimension.label.clone(),
            value: row.value(&dimension.key).unwrap_or(0.0),
            color: dimension.color.clone(),
        })
        .collect()
}

pub fn focus_suggestion(summary: &Summary) -> Option<String> {
    if summary.weakest.dimension == NO_DIMENSION {
        return None;
    }

    Some(format!(
        "{} is at {}%. Suggested focus: run 3 targeted activities next month.",
        summary.weakest.dimension,
        round_half_up(summary.weakest.value)
    ))
}

/// Mean value of each dimension across all rows, in registry order.
pub fn dimension_averages(rows: &[MonthRow], dims: &[Dimension]) -> Vec<(String, f64)> {
    dims.iter()
        .map(|dimension| {
            let total: f64 = rows
                .iter()
                .map(|row| row.value(&dimension.key).unwrap_or(0.0))
                .sum();
            let average = if rows.is_empty() {
                0.0
            } else {
                total / rows.len() as f64
            };
            (dimension.label.clone(), average)
        })
        .collect()
}

/// Index of the month a dashboard is looking at, kept inside the row range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    index: usize,
    len: usize,
}

impl MonthCursor {
    /// Starts on the newest month.
    pub fn latest(len: usize) -> Self {
        Self {
            index: len.saturating_sub(1),
            len,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn select(&mut self, index: usize) -> usize {
        self.index = index.min(self.len.saturating_sub(1));
        self.index
    }

    pub fn step_back(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    pub fn step_forward(&mut self) -> usize {
        self.select(self.index + 1)
    }
}
