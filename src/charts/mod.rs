//! Chart payloads derived from the filtered table.
//!
//! Each payload is plain data: the egui renderer in `ui::plot` draws it and
//! `Session::charts_json` exports it unchanged.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::model::{Table, Value};
use crate::error::PipelineError;

pub mod regression;

use regression::{TrendLine, fit_line};

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// Points of one category in a scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub value: Value,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub x: String,
    pub y: String,
    pub color_by: String,
    pub series: Vec<Series>,
}

/// Per-category means of each measure, in `GroupedBarChart::measures` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub value: Value,
    pub means: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBarChart {
    pub group_by: String,
    pub measures: Vec<String>,
    pub groups: Vec<BarGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub value: Value,
    pub count: usize,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub column: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionChart {
    pub x: String,
    pub y: String,
    pub points: Vec<[f64; 2]>,
    pub trend: Option<TrendLine>,
}

/// The four charts shown below the filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub scatter: ScatterChart,
    pub nutrients: GroupedBarChart,
    pub pie: PieChart,
    pub regression: RegressionChart,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn build_charts(
    table: &Table,
    config: &DashboardConfig,
    trend_line: bool,
) -> Result<ChartSet, PipelineError> {
    let scatter = &config.scatter;
    let regression = &config.regression;
    Ok(ChartSet {
        scatter: scatter_chart(table, &scatter.x, &scatter.y, &scatter.color_by)?,
        nutrients: grouped_bar_chart(
            table,
            &config.nutrients.group_by,
            &config.nutrients.measures,
        )?,
        pie: pie_chart(table, &config.pie.column)?,
        regression: regression_chart(table, &regression.x, &regression.y, trend_line)?,
    })
}

/// `(x, y)` pairs of two numeric columns; rows where either is null are dropped.
fn xy_points(table: &Table, x: &str, y: &str) -> Result<Vec<Option<[f64; 2]>>, PipelineError> {
    let xs = table.numeric_column(x)?;
    let ys = table.numeric_column(y)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| x.zip(y).map(|(x, y)| [x, y]))
        .collect())
}

pub fn scatter_chart(
    table: &Table,
    x: &str,
    y: &str,
    color_by: &str,
) -> Result<ScatterChart, PipelineError> {
    let points = xy_points(table, x, y)?;
    let colors = table.column(color_by)?;

    let mut by_value: BTreeMap<Value, Vec<[f64; 2]>> = BTreeMap::new();
    for (p, c) in points.into_iter().zip(colors) {
        if let Some(p) = p {
            by_value.entry(c.clone()).or_default().push(p);
        }
    }

    Ok(ScatterChart {
        x: x.to_string(),
        y: y.to_string(),
        color_by: color_by.to_string(),
        series: by_value
            .into_iter()
            .map(|(value, points)| Series { value, points })
            .collect(),
    })
}

pub fn grouped_bar_chart(
    table: &Table,
    group_by: &str,
    measures: &[String],
) -> Result<GroupedBarChart, PipelineError> {
    let keys = table.column(group_by)?;
    let columns = measures
        .iter()
        .map(|m| table.numeric_column(m))
        .collect::<Result<Vec<_>, _>>()?;

    // group value → per-measure (sum, count)
    let mut acc: BTreeMap<&Value, Vec<(f64, usize)>> = BTreeMap::new();
    for (row, key) in keys.into_iter().enumerate() {
        let sums = acc.entry(key).or_insert_with(|| vec![(0.0, 0); measures.len()]);
        for (slot, col) in sums.iter_mut().zip(&columns) {
            if let Some(v) = col[row] {
                slot.0 += v;
                slot.1 += 1;
            }
        }
    }

    Ok(GroupedBarChart {
        group_by: group_by.to_string(),
        measures: measures.to_vec(),
        groups: acc
            .into_iter()
            .map(|(value, sums)| BarGroup {
                value: value.clone(),
                means: sums
                    .into_iter()
                    .map(|(sum, n)| if n == 0 { 0.0 } else { sum / n as f64 })
                    .collect(),
            })
            .collect(),
    })
}

/// Value counts, largest first.
pub fn pie_chart(table: &Table, column: &str) -> Result<PieChart, PipelineError> {
    let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
    for v in table.column(column)? {
        *counts.entry(v).or_default() += 1;
    }
    let total = table.len();

    let mut slices: Vec<PieSlice> = counts
        .into_iter()
        .map(|(value, count)| PieSlice {
            value: value.clone(),
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();
    // stable sort keeps value order among equal counts
    slices.sort_by(|a, b| b.count.cmp(&a.count));

    Ok(PieChart {
        column: column.to_string(),
        slices,
    })
}

pub fn regression_chart(
    table: &Table,
    x: &str,
    y: &str,
    trend_line: bool,
) -> Result<RegressionChart, PipelineError> {
    let points: Vec<[f64; 2]> = xy_points(table, x, y)?.into_iter().flatten().collect();
    let trend = if trend_line { fit_line(&points) } else { None };
    Ok(RegressionChart {
        x: x.to_string(),
        y: y.to_string(),
        points,
        trend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table;

    fn crops() -> Table {
        table(
            &[
                "Temperature",
                "Humidity",
                "Moisture",
                "Soil Type",
                "Crop Type",
                "Nitrogen",
                "Potassium",
                "Phosphorous",
                "Fertilizer Name",
            ],
            &[
                &["26", "52", "38", "Sandy", "Maize", "37", "0", "0", "Urea"],
                &["29", "52", "45", "Loamy", "Sugarcane", "12", "0", "36", "DAP"],
                &["34", "65", "62", "Black", "Cotton", "7", "9", "30", "14-35-14"],
                &["32", "62", "34", "Red", "Maize", "22", "0", "20", "Urea"],
                &["28", "", "46", "Clayey", "Maize", "35", "0", "0", "Urea"],
            ],
        )
    }

    #[test]
    fn scatter_groups_by_colour_and_skips_nulls() {
        let c = scatter_chart(&crops(), "Temperature", "Humidity", "Crop Type").unwrap();
        let labels: Vec<String> = c.series.iter().map(|s| s.value.to_string()).collect();
        assert_eq!(labels, vec!["Cotton", "Maize", "Sugarcane"]);
        let maize = &c.series[1];
        assert_eq!(maize.points, vec![[26.0, 52.0], [32.0, 62.0]]);
    }

    #[test]
    fn bar_means_per_group() {
        let measures = vec!["Nitrogen".to_string(), "Phosphorous".to_string()];
        let c = grouped_bar_chart(&crops(), "Crop Type", &measures).unwrap();
        assert_eq!(c.groups.len(), 3);
        let maize = c.groups.iter().find(|g| g.value == Value::from("Maize")).unwrap();
        assert_eq!(maize.means, vec![(37.0 + 22.0 + 35.0) / 3.0, 20.0 / 3.0]);
    }

    #[test]
    fn pie_counts_sorted_descending() {
        let c = pie_chart(&crops(), "Fertilizer Name").unwrap();
        assert_eq!(c.slices[0].value, Value::from("Urea"));
        assert_eq!(c.slices[0].count, 3);
        assert!((c.slices[0].fraction - 0.6).abs() < 1e-12);
        // ties keep value order
        assert_eq!(c.slices[1].value, Value::from("14-35-14"));
        assert_eq!(c.slices[2].value, Value::from("DAP"));
        let total: f64 = c.slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regression_trend_is_optional() {
        let with = regression_chart(&crops(), "Moisture", "Nitrogen", true).unwrap();
        assert_eq!(with.points.len(), 5);
        assert!(with.trend.is_some());
        let without = regression_chart(&crops(), "Moisture", "Nitrogen", false).unwrap();
        assert!(without.trend.is_none());
    }

    #[test]
    fn empty_table_gives_empty_charts() {
        let t = crops();
        let empty = t.with_rows(Vec::new());
        let set = build_charts(&empty, &DashboardConfig::default(), true).unwrap();
        assert!(set.scatter.series.is_empty());
        assert!(set.nutrients.groups.is_empty());
        assert!(set.pie.slices.is_empty());
        assert!(set.regression.trend.is_none());
    }

    #[test]
    fn chart_on_text_column_fails() {
        assert!(matches!(
            regression_chart(&crops(), "Soil Type", "Nitrogen", true),
            Err(PipelineError::NotNumeric { .. })
        ));
    }

    #[test]
    fn payloads_serialize_values_bare() {
        let c = pie_chart(&crops(), "Crop Type").unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["slices"][0]["value"], "Maize");
        assert_eq!(json["slices"][0]["count"], 3);
    }
}
