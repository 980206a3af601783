use std::collections::{BTreeMap, HashMap};

use crate::models::{Cell, Dimension, MonthRow, RawMonthRecord};
use crate::month::MonthKey;
use crate::registry::dimension_key;
use crate::window::Window;

/// Dense month x dimension grid for `window`. Months without a record and
/// dimensions without an entry read as zero.
pub fn build(
    window: &Window,
    raw_by_month: &BTreeMap<MonthKey, RawMonthRecord>,
    dims: &[Dimension],
) -> Vec<MonthRow> {
    window
        .months()
        .into_iter()
        .map(|month| build_row(month, raw_by_month.get(&month), dims))
        .collect()
}

fn build_row(month: MonthKey, record: Option<&RawMonthRecord>, dims: &[Dimension]) -> MonthRow {
    let mut reported: HashMap<String, f64> = HashMap::new();
    if let Some(record) = record {
        for entry in &record.entries {
            let value = if entry.percentage.is_finite() {
                entry.percentage
            } else {
                0.0
            };
            reported.insert(dimension_key(&entry.dimension_name), value);
        }
    }

    let values = dims
        .iter()
        .map(|dimension| Cell {
            key: dimension.key.clone(),
            value: reported.get(&dimension.key).copied().unwrap_or(0.0),
        })
        .collect();

    MonthRow { month, values }
}
