use std::io;
use std::path::Path;

use anyhow::Context;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::{Dimension, MonthRow};

pub const DEFAULT_CSV_NAME: &str = "wellness-monthly.csv";

/// One flat export row: `month` followed by one column per dimension label.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub month: String,
    pub cells: Vec<(String, f64)>,
}

impl Serialize for ExportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry("month", &self.month)?;
        for (label, value) in &self.cells {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

/// Columns are the full registry at call time, in registry order.
pub fn export_rows(rows: &[MonthRow], dims: &[Dimension]) -> Vec<ExportRow> {
    rows.iter()
        .map(|row| ExportRow {
            month: row.month.to_string(),
            cells: dims
                .iter()
                .map(|dimension| {
                    (
                        dimension.label.clone(),
                        row.value(&dimension.key).unwrap_or(0.0),
                    )
                })
                .collect(),
        })
        .collect()
}

pub fn write_csv<W: io::Write>(
    writer: W,
    rows: &[MonthRow],
    dims: &[Dimension],
) -> anyhow::Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["month".to_string()];
    header.extend(dims.iter().map(|dimension| dimension.label.clone()));
    csv.write_record(&header)?;

    let exported = export_rows(rows, dims);
    for row in &exported {
        let mut record = vec![row.month.clone()];
        record.extend(row.cells.iter().map(|(_, value)| value.to_string()));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(exported.len())
}

pub fn write_csv_file(path: &Path, rows: &[MonthRow], dims: &[Dimension]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, rows, dims)
}
