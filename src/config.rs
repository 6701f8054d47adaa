use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::model::Schema;
use crate::error::PipelineError;

/// Optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "agri-dash.json";

// ---------------------------------------------------------------------------
// Column bindings for each chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterBinding {
    pub x: String,
    pub y: String,
    pub color_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientBinding {
    pub group_by: String,
    pub measures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieBinding {
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionBinding {
    pub x: String,
    pub y: String,
    /// Whether the trend line starts enabled.
    pub trend_line: bool,
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Which columns are filterable and which columns feed which chart.
/// Every field falls back to the fertilizer-dataset defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub filter_columns: Vec<String>,
    pub preview_rows: usize,
    pub scatter: ScatterBinding,
    pub nutrients: NutrientBinding,
    pub pie: PieBinding,
    pub regression: RegressionBinding,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            filter_columns: vec!["Soil Type".into(), "Crop Type".into(), "Fertilizer Name".into()],
            preview_rows: 5,
            scatter: ScatterBinding {
                x: "Temperature".into(),
                y: "Humidity".into(),
                color_by: "Crop Type".into(),
            },
            nutrients: NutrientBinding {
                group_by: "Crop Type".into(),
                measures: vec!["Nitrogen".into(), "Potassium".into(), "Phosphorous".into()],
            },
            pie: PieBinding {
                column: "Fertilizer Name".into(),
            },
            regression: RegressionBinding {
                x: "Moisture".into(),
                y: "Nitrogen".into(),
                trend_line: true,
            },
        }
    }
}

impl DashboardConfig {
    /// Read `path` if it exists; fall back to defaults otherwise.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| serde_json::from_str(&text).map_err(anyhow::Error::from))
        {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Columns read as categories: filters, scatter colour, bar groups, pie.
    pub fn categorical_columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = self.filter_columns.iter().map(String::as_str).collect();
        cols.push(&self.scatter.color_by);
        cols.push(&self.nutrients.group_by);
        cols.push(&self.pie.column);
        cols
    }

    /// Columns that must hold numbers: chart axes and nutrient measures.
    pub fn numeric_columns(&self) -> Vec<&str> {
        let mut cols = vec![
            self.scatter.x.as_str(),
            self.scatter.y.as_str(),
            self.regression.x.as_str(),
            self.regression.y.as_str(),
        ];
        cols.extend(self.nutrients.measures.iter().map(String::as_str));
        cols
    }

    /// Check a freshly loaded schema before anything is charted.
    pub fn validate(&self, schema: &Schema) -> Result<(), PipelineError> {
        for col in self.categorical_columns() {
            schema.require(col)?;
        }
        for col in self.numeric_columns() {
            schema.require_numeric(col)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{ "preview_rows": 10, "pie": { "column": "Soil Type" } }"#).unwrap();
        assert_eq!(cfg.preview_rows, 10);
        assert_eq!(cfg.pie.column, "Soil Type");
        assert_eq!(cfg.scatter, DashboardConfig::default().scatter);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = DashboardConfig::load_or_default(Path::new("does/not/exist.json"));
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn validate_reports_missing_crop_type() {
        let t = table(&["Soil Type", "Temperature"], &[&["Sandy", "26"]]);
        let err = DashboardConfig::default().validate(&t.schema).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ColumnNotFound { ref column, .. } if column == "Crop Type"
        ));
    }

    #[test]
    fn validate_rejects_text_in_numeric_axis() {
        let cfg = DashboardConfig {
            filter_columns: vec![],
            scatter: ScatterBinding {
                x: "t".into(),
                y: "t".into(),
                color_by: "c".into(),
            },
            nutrients: NutrientBinding {
                group_by: "c".into(),
                measures: vec!["t".into()],
            },
            pie: PieBinding { column: "c".into() },
            regression: RegressionBinding {
                x: "t".into(),
                y: "t".into(),
                trend_line: false,
            },
            preview_rows: 5,
        };
        let ok = table(&["t", "c"], &[&["1", "a"]]);
        assert!(cfg.validate(&ok.schema).is_ok());

        let bad = table(&["t", "c"], &[&["warm", "a"]]);
        assert!(matches!(
            cfg.validate(&bad.schema),
            Err(PipelineError::NotNumeric { .. })
        ));
    }
}
