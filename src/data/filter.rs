use std::collections::{BTreeMap, BTreeSet};

use super::model::{Table, Value};
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Domains and selections
// ---------------------------------------------------------------------------

/// Distinct values observed in one column.
pub type Domain = BTreeSet<Value>;

/// Per-column allow-lists: column name → set of selected values.
pub type FilterSelections = BTreeMap<String, BTreeSet<Value>>;

/// Distinct values present in `column`.
pub fn compute_domain(table: &Table, column: &str) -> Result<Domain, PipelineError> {
    Ok(table.column(column)?.into_iter().cloned().collect())
}

/// Initialise selections with every value selected (i.e., show everything).
pub fn init_selections(table: &Table, columns: &[String]) -> Result<FilterSelections, PipelineError> {
    columns
        .iter()
        .map(|col| compute_domain(table, col).map(|domain| (col.clone(), domain)))
        .collect()
}

/// Rows of `table` whose value in every selected column is in its allow-list.
///
/// * `selections` empty → the table unchanged
/// * any allow-list empty → an empty table, no rows scanned
/// * a selection naming a column outside the schema → `ColumnNotFound`
///
/// Surviving rows keep their original relative order.
pub fn apply_filters(table: &Table, selections: &FilterSelections) -> Result<Table, PipelineError> {
    for col in selections.keys() {
        table.schema.require(col)?;
    }
    if selections.is_empty() {
        return Ok(table.clone());
    }
    if selections.values().any(BTreeSet::is_empty) {
        return Ok(table.with_rows(Vec::new()));
    }

    let rows = table
        .rows
        .iter()
        .filter(|row| {
            selections
                .iter()
                .all(|(col, allowed)| allowed.contains(Table::cell(row, col)))
        })
        .cloned()
        .collect();
    Ok(table.with_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table;

    fn soils() -> Table {
        table(
            &["Temperature", "Humidity", "Soil Type"],
            &[
                &["26", "52", "Sandy"],
                &["29", "52", "Clay"],
                &["34", "65", "Sandy"],
                &["32", "62", "Loamy"],
            ],
        )
    }

    fn select(col: &str, vals: &[&str]) -> FilterSelections {
        let mut s = FilterSelections::new();
        s.insert(col.to_string(), vals.iter().map(|v| Value::from(*v)).collect());
        s
    }

    #[test]
    fn domain_lists_distinct_values() {
        let d = compute_domain(&soils(), "Soil Type").unwrap();
        let expected: Domain = ["Clay", "Loamy", "Sandy"].iter().map(|v| Value::from(*v)).collect();
        assert_eq!(d, expected);
    }

    #[test]
    fn domain_is_idempotent() {
        let t = soils();
        assert_eq!(
            compute_domain(&t, "Temperature").unwrap(),
            compute_domain(&t, "Temperature").unwrap()
        );
    }

    #[test]
    fn domain_of_missing_column_fails() {
        assert!(matches!(
            compute_domain(&soils(), "Crop Type"),
            Err(PipelineError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn sandy_rows_in_original_order() {
        let t = soils();
        let out = apply_filters(&t, &select("Soil Type", &["Sandy"])).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows[0], t.rows[0]);
        assert_eq!(out.rows[1], t.rows[2]);
        assert_eq!(out.schema, t.schema);
    }

    #[test]
    fn empty_selections_return_table_unchanged() {
        let t = soils();
        assert_eq!(apply_filters(&t, &FilterSelections::new()).unwrap(), t);
    }

    #[test]
    fn full_domains_reproduce_table() {
        let t = soils();
        let cols: Vec<String> = t.schema.names();
        let full = init_selections(&t, &cols).unwrap();
        assert_eq!(apply_filters(&t, &full).unwrap(), t);
    }

    #[test]
    fn any_empty_allow_list_empties_result() {
        let t = soils();
        let mut s = init_selections(&t, &["Soil Type".to_string()]).unwrap();
        s.insert("Humidity".into(), BTreeSet::new());
        let out = apply_filters(&t, &s).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.schema, t.schema);
    }

    #[test]
    fn result_is_subset_of_table() {
        let t = soils();
        let mut s = select("Soil Type", &["Sandy", "Loamy"]);
        s.insert("Humidity".into(), [Value::Integer(52), Value::Integer(62)].into());
        let out = apply_filters(&t, &s).unwrap();
        assert!(out.len() <= t.len());
        assert!(out.rows.iter().all(|r| t.rows.contains(r)));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn narrowing_then_widening_restores_table() {
        let t = table(
            &["Temperature", "Humidity", "Soil Type"],
            &[&["26", "52", "Sandy"], &["29", "52", "Clay"], &["31", "60", "Sandy"]],
        );
        let clay = apply_filters(&t, &select("Soil Type", &["Clay"])).unwrap();
        assert_eq!(clay.len(), 1);
        let widened = apply_filters(&t, &select("Soil Type", &["Sandy", "Clay"])).unwrap();
        assert_eq!(widened, t);
    }

    #[test]
    fn selection_on_unknown_column_fails() {
        assert!(matches!(
            apply_filters(&soils(), &select("Crop Type", &["Maize"])),
            Err(PipelineError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn input_table_is_not_mutated() {
        let t = soils();
        let before = t.clone();
        let _ = apply_filters(&t, &select("Soil Type", &["Clay"])).unwrap();
        assert_eq!(t, before);
    }
}
