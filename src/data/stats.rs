use serde::Serialize;

use super::model::{ColumnType, Row, Table};

/// Everything the overview section shows about a freshly loaded table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOverview {
    pub n_rows: usize,
    pub n_columns: usize,
    pub column_types: Vec<(String, ColumnType)>,
    pub head: Vec<Row>,
    pub summaries: Vec<NumericSummary>,
}

impl TableOverview {
    pub fn of(table: &Table, preview_rows: usize) -> Self {
        TableOverview {
            n_rows: table.len(),
            n_columns: table.n_columns(),
            column_types: table
                .schema
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.kind))
                .collect(),
            head: table.head(preview_rows).to_vec(),
            summaries: describe(table),
        }
    }
}

/// `describe()`-style statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summaries for every numeric column that has at least one value.
pub fn describe(table: &Table) -> Vec<NumericSummary> {
    table
        .schema
        .columns()
        .iter()
        .filter(|c| c.kind == ColumnType::Numeric)
        .filter_map(|c| {
            let mut values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|r| Table::cell(r, &c.name).as_f64())
                .collect();
            summarize(&c.name, &mut values)
        })
        .collect()
}

fn summarize(column: &str, values: &mut [f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Some(NumericSummary {
        column: column.to_string(),
        count: n,
        mean,
        std,
        min: values[0],
        q25: quantile(values, 0.25),
        median: quantile(values, 0.5),
        q75: quantile(values, 0.75),
        max: values[n - 1],
    })
}

/// Linear-interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
