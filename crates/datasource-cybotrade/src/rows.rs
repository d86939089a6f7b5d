//! Conversion of JSON rows into a DataFrame.

use datasource_core::{DataError, Result};
use polars::prelude::*;
use serde_json::Value;

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Boolean,
    Int64,
    Float64,
    String,
}

/// Builds a DataFrame with one column per row key, in first-seen order.
///
/// Keys missing from a row and JSON nulls become nulls.
pub(crate) fn rows_to_frame(rows: &[Value]) -> Result<DataFrame> {
    if rows.is_empty() {
        return Ok(DataFrame::empty());
    }

    let mut names: Vec<&str> = Vec::new();
    for row in rows {
        let Value::Object(fields) = row else {
            return Err(DataError::Parse(format!(
                "expected a JSON object per row, got {row}"
            )));
        };
        for key in fields.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key.as_str());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| build_column(name, rows))
        .collect::<Vec<_>>();

    DataFrame::new(columns).map_err(|e| DataError::Parse(e.to_string()))
}

fn build_column(name: &str, rows: &[Value]) -> Column {
    let cells: Vec<Option<&Value>> = rows
        .iter()
        .map(|row| row.get(name).filter(|v| !v.is_null()))
        .collect();
    let column_name = PlSmallStr::from(name);

    match infer_kind(&cells) {
        ColumnKind::Boolean => Column::new(
            column_name,
            cells
                .iter()
                .map(|c| c.and_then(Value::as_bool))
                .collect::<Vec<_>>(),
        ),
        ColumnKind::Int64 => Column::new(
            column_name,
            cells
                .iter()
                .map(|c| c.and_then(Value::as_i64))
                .collect::<Vec<_>>(),
        ),
        ColumnKind::Float64 => Column::new(
            column_name,
            cells
                .iter()
                .map(|c| c.and_then(Value::as_f64))
                .collect::<Vec<_>>(),
        ),
        ColumnKind::String => Column::new(
            column_name,
            cells
                .iter()
                .map(|c| c.map(as_text))
                .collect::<Vec<Option<String>>>(),
        ),
    }
}

fn infer_kind(cells: &[Option<&Value>]) -> ColumnKind {
    let present = || cells.iter().flatten();

    if present().next().is_none() {
        ColumnKind::String
    } else if present().all(|v| v.is_boolean()) {
        ColumnKind::Boolean
    } else if present().all(|v| v.as_i64().is_some()) {
        ColumnKind::Int64
    } else if present().all(|v| v.is_number()) {
        ColumnKind::Float64
    } else {
        ColumnKind::String
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
