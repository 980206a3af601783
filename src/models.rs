use serde::Serialize;

use crate::month::MonthKey;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub key: String,
    pub label: String,
    pub color: String,
}

/// One validated per-dimension entry from a backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub dimension_name: String,
    pub percentage: f64,
    pub color: Option<String>,
}

/// Everything the backend reported for one (school, month) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMonthRecord {
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub key: String,
    pub value: f64,
}

/// One month of the dense matrix. Cells follow registry order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRow {
    pub month: MonthKey,
    pub values: Vec<Cell>,
}

impl MonthRow {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|cell| cell.key == key)
            .map(|cell| cell.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|cell| cell.key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weakest {
    pub dimension: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub overall: i64,
    pub weakest: Weakest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct School {
    pub id: String,
    pub name: String,
}
