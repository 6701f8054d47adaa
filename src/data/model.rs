use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Value – a single cell of the uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Domains are kept in `BTreeSet`s downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

// Equality follows `Ord`: `NaN == NaN` and `0.0 != -0.0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Cell texts that pandas and friends write for a missing value.
const NA_TOKENS: [&str; 9] = ["NaN", "nan", "NA", "N/A", "n/a", "NULL", "null", "None", "<NA>"];

impl Value {
    /// A float cell; `NaN` and infinities are treated as missing.
    pub fn float(v: f64) -> Value {
        if v.is_finite() {
            Value::Float(v)
        } else {
            Value::Null
        }
    }

    /// Interpret the value as an `f64` for charting and statistics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Guess the type of a raw text cell from a delimited file.
    ///
    /// Empty cells, the usual missing-value markers (`NaN`, `NA`, `null`, ...)
    /// and non-finite numbers all read as `Null`.
    pub fn parse_cell(s: &str) -> Value {
        if s.is_empty() || NA_TOKENS.contains(&s) {
            return Value::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return Value::float(f);
        }
        if s == "true" || s == "false" {
            return Value::Bool(s == "true");
        }
        Value::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Schema – column name → type tag, discovered at load time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "numeric"),
            ColumnType::Categorical => write!(f, "categorical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    /// False when every cell is null (or the table has no rows).
    pub has_values: bool,
}

/// Ordered column list of a loaded table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Schema { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, name: &str) -> Option<ColumnType> {
        self.columns.iter().find(|c| c.name == name).map(|c| c.kind)
    }

    /// Type of `name`, or [`PipelineError::ColumnNotFound`].
    pub fn require(&self, name: &str) -> Result<ColumnType, PipelineError> {
        self.get(name).ok_or_else(|| PipelineError::ColumnNotFound {
            column: name.to_string(),
            available: self.names(),
        })
    }

    /// Like [`Schema::require`] but additionally insists on a numeric column.
    /// A column without any values passes: it has nothing to contradict it.
    pub fn require_numeric(&self, name: &str) -> Result<(), PipelineError> {
        let found = self.require(name)?;
        let empty = self.columns.iter().any(|c| c.name == name && !c.has_values);
        if found == ColumnType::Numeric || empty {
            return Ok(());
        }
        Err(PipelineError::NotNumeric {
            column: name.to_string(),
            found,
        })
    }
}

// ---------------------------------------------------------------------------
// Table – schema plus rows
// ---------------------------------------------------------------------------

/// One row: column name → value. Absent columns read as [`Value::Null`].
pub type Row = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

/// The in-memory table produced by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build a table from rows, inferring each column's type.
    ///
    /// A column is numeric when it has at least one non-null cell and every
    /// non-null cell is an integer or a float.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        let columns = column_names
            .into_iter()
            .map(|name| {
                let mut seen_value = false;
                let mut all_numeric = true;
                for row in &rows {
                    match row.get(&name) {
                        None | Some(Value::Null) => {}
                        Some(v) => {
                            seen_value = true;
                            if v.as_f64().is_none() {
                                all_numeric = false;
                                break;
                            }
                        }
                    }
                }
                let kind = if seen_value && all_numeric {
                    ColumnType::Numeric
                } else {
                    ColumnType::Categorical
                };
                Column {
                    name,
                    kind,
                    has_values: seen_value,
                }
            })
            .collect();

        Table {
            schema: Schema::new(columns),
            rows,
        }
    }

    /// A table with the same schema and a different set of rows.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Table {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_columns(&self) -> usize {
        self.schema.len()
    }

    /// Cell lookup; missing cells are `Null`.
    pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Value {
        row.get(column).unwrap_or(&NULL)
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, PipelineError> {
        self.schema.require(name)?;
        Ok(self.rows.iter().map(|r| Table::cell(r, name)).collect())
    }

    /// Numeric view of one column; nulls become `None`.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>, PipelineError> {
        self.schema.require_numeric(name)?;
        Ok(self
            .rows
            .iter()
            .map(|r| Table::cell(r, name).as_f64())
            .collect())
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> &[Row] {
        &self.rows[..n.min(self.rows.len())]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a table from a header and string cells, typed like the CSV loader.
    pub(crate) fn table(header: &[&str], cells: &[&[&str]]) -> Table {
        let names: Vec<String> = header.iter().map(|h| h.to_string()).collect();
        let rows = cells
            .iter()
            .map(|r| {
                names
                    .iter()
                    .zip(r.iter())
                    .map(|(n, c)| (n.clone(), Value::parse_cell(c)))
                    .collect()
            })
            .collect();
        Table::from_rows(names, rows)
    }

    #[test]
    fn infers_column_types() {
        let t = table(
            &["Temperature", "Soil Type", "Moisture"],
            &[&["26", "Sandy", ""], &["29.5", "Clay", "41"], &["34", "Loamy", "x"]],
        );
        assert_eq!(t.schema.get("Temperature"), Some(ColumnType::Numeric));
        assert_eq!(t.schema.get("Soil Type"), Some(ColumnType::Categorical));
        assert_eq!(t.schema.get("Moisture"), Some(ColumnType::Categorical));
        assert_eq!(t.n_columns(), 3);
    }

    #[test]
    fn all_null_column_is_categorical() {
        let t = table(&["a", "b"], &[&["1", ""], &["2", ""]]);
        assert_eq!(t.schema.get("b"), Some(ColumnType::Categorical));
    }

    #[test]
    fn columns_without_values_pass_as_numeric() {
        let blank = table(&["a", "b"], &[&["1", ""], &["2", "NaN"]]);
        assert!(blank.schema.require_numeric("b").is_ok());
        assert_eq!(blank.numeric_column("b").unwrap(), vec![None, None]);

        let header_only = table(&["Temperature", "Soil Type"], &[]);
        assert!(header_only.schema.require_numeric("Temperature").is_ok());
        assert!(header_only.schema.require_numeric("Soil Type").is_ok());
        assert!(header_only.numeric_column("Temperature").unwrap().is_empty());
    }

    #[test]
    fn missing_markers_parse_as_null() {
        for cell in ["NaN", "nan", "NA", "N/A", "null", "None", "inf", "-infinity"] {
            assert_eq!(Value::parse_cell(cell), Value::Null, "{cell}");
        }
        assert_eq!(Value::parse_cell("1e3"), Value::Float(1000.0));
        assert_eq!(Value::parse_cell("Nairobi"), Value::from("Nairobi"));
    }

    #[test]
    fn equality_agrees_with_ordering() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));

        let set: std::collections::BTreeSet<Value> =
            [Value::Float(0.0), Value::Float(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Value::Float(-0.0)));
    }

    #[test]
    fn require_reports_available_columns() {
        let t = table(&["Soil Type"], &[&["Sandy"]]);
        let err = t.schema.require("Crop Type").unwrap_err();
        assert_eq!(
            err,
            PipelineError::ColumnNotFound {
                column: "Crop Type".into(),
                available: vec!["Soil Type".into()],
            }
        );
    }

    #[test]
    fn numeric_column_rejects_text() {
        let t = table(&["Temperature"], &[&["hot"]]);
        assert!(matches!(
            t.numeric_column("Temperature"),
            Err(PipelineError::NotNumeric { .. })
        ));
    }

    #[test]
    fn value_order_groups_by_kind() {
        let mut vals = vec![
            Value::from("b"),
            Value::Float(2.5),
            Value::Null,
            Value::Integer(3),
            Value::from("a"),
        ];
        vals.sort();
        assert_eq!(
            vals,
            vec![
                Value::Null,
                Value::Integer(3),
                Value::Float(2.5),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn head_clamps_to_length() {
        let t = table(&["a"], &[&["1"], &["2"]]);
        assert_eq!(t.head(5).len(), 2);
        assert_eq!(t.head(1).len(), 1);
    }
}
