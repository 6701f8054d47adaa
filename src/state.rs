use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};

use crate::charts::{ChartSet, build_charts};
use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{Domain, FilterSelections, apply_filters, compute_domain, init_selections};
use crate::data::loader::load_bytes;
use crate::data::model::{Table, Value};
use crate::data::stats::TableOverview;

// ---------------------------------------------------------------------------
// Events and notices
// ---------------------------------------------------------------------------

/// Everything the user can do to the session.
#[derive(Debug, Clone)]
pub enum Event {
    /// A file was picked; `bytes` is its full content.
    Upload { name: String, bytes: Vec<u8> },
    /// Replace the selection of one column.
    SetSelection { column: String, values: BTreeSet<Value> },
    /// Flip one value in a column's selection.
    ToggleValue { column: String, value: Value },
    SelectAll(String),
    SelectNone(String),
    SetTrendLine(bool),
}

/// Informational states that are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoFileProvided,
    EmptyFilterResult,
}

// ---------------------------------------------------------------------------
// Loaded table and its derived data
// ---------------------------------------------------------------------------

/// A successfully parsed upload plus what is computed once per load.
pub struct LoadedTable {
    pub source_name: String,
    pub table: Table,
    pub overview: TableOverview,
    /// Domain of every filter column.
    pub domains: BTreeMap<String, Domain>,
    pub scatter_colors: ColorMap,
    pub pie_colors: ColorMap,
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
pub struct Session {
    pub config: DashboardConfig,

    /// Loaded table (None until a file is uploaded).
    pub loaded: Option<LoadedTable>,

    /// Per-column filter selections.
    pub selections: FilterSelections,

    /// Rows passing the current selections.
    pub filtered: Option<Table>,

    /// Chart payloads built from `filtered`.
    pub charts: Option<ChartSet>,

    pub trend_line: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            trend_line: config.regression.trend_line,
            config,
            loaded: None,
            selections: FilterSelections::new(),
            filtered: None,
            charts: None,
            status_message: None,
        }
    }

    /// Apply one event and recompute everything derived from it.
    ///
    /// The status line reflects the outcome of the latest event: an error
    /// replaces it, a success clears it.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        let result = self.apply(event);
        self.status_message = match &result {
            Ok(()) => None,
            Err(e) => Some(format!("Error: {e:#}")),
        };
        result
    }

    fn apply(&mut self, event: Event) -> Result<()> {
        let column = match &event {
            Event::Upload { name, bytes } => return self.upload(name.clone(), bytes),
            Event::SetTrendLine(on) => {
                self.trend_line = *on;
                return self.refresh();
            }
            Event::SetSelection { column, .. }
            | Event::ToggleValue { column, .. }
            | Event::SelectAll(column)
            | Event::SelectNone(column) => column.clone(),
        };
        let Some(domain) = self.domain(&column).cloned() else {
            log::warn!("Ignoring filter change on non-filter column '{column}'");
            return Ok(());
        };

        let selected = self.selections.entry(column).or_default();
        match event {
            Event::SetSelection { values, .. } => {
                *selected = values.into_iter().filter(|v| domain.contains(v)).collect();
            }
            Event::ToggleValue { value, .. } => {
                if !selected.remove(&value) && domain.contains(&value) {
                    selected.insert(value);
                }
            }
            Event::SelectAll(_) => *selected = domain,
            Event::SelectNone(_) => selected.clear(),
            Event::Upload { .. } | Event::SetTrendLine(_) => {}
        }
        self.refresh()
    }

    pub fn notice(&self) -> Option<Notice> {
        match &self.filtered {
            None => Some(Notice::NoFileProvided),
            Some(t) if t.is_empty() => Some(Notice::EmptyFilterResult),
            Some(_) => None,
        }
    }

    pub fn domain(&self, column: &str) -> Option<&Domain> {
        self.loaded.as_ref()?.domains.get(column)
    }

    /// Current chart payloads as pretty-printed JSON.
    pub fn charts_json(&self) -> Result<String> {
        let charts = self.charts.as_ref().context("no charts to export")?;
        serde_json::to_string_pretty(charts).context("serializing charts")
    }

    /// Parse, validate and ingest an uploaded file.
    /// On failure the previous table is dropped.
    fn upload(&mut self, name: String, bytes: &[u8]) -> Result<()> {
        self.clear();
        let table = load_bytes(&name, bytes).with_context(|| format!("loading {name}"))?;
        self.ingest(name, table)
    }

    fn ingest(&mut self, source_name: String, table: Table) -> Result<()> {
        self.config.validate(&table.schema)?;

        let selections = init_selections(&table, &self.config.filter_columns)?;
        let scatter_colors = ColorMap::new(&compute_domain(&table, &self.config.scatter.color_by)?);
        let pie_colors = ColorMap::new(&compute_domain(&table, &self.config.pie.column)?);
        let overview = TableOverview::of(&table, self.config.preview_rows);

        log::info!(
            "Loaded {} rows with columns {:?} from {source_name}",
            table.len(),
            table.schema.names()
        );

        self.loaded = Some(LoadedTable {
            source_name,
            table,
            overview,
            domains: selections.clone(),
            scatter_colors,
            pie_colors,
        });
        self.selections = selections;
        self.refresh()
    }

    /// Recompute the filtered table and the charts after any change.
    fn refresh(&mut self) -> Result<()> {
        let Some(loaded) = &self.loaded else {
            return Ok(());
        };
        let filtered = apply_filters(&loaded.table, &self.selections)?;
        let charts = build_charts(&filtered, &self.config, self.trend_line)?;
        log::debug!("{} of {} rows pass the filters", filtered.len(), loaded.table.len());

        self.filtered = Some(filtered);
        self.charts = Some(charts);
        Ok(())
    }

    fn clear(&mut self) {
        self.loaded = None;
        self.selections.clear();
        self.filtered = None;
        self.charts = None;
    }
}
