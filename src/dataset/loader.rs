use serde_json::{Map, Number, Value};
use std::io::Read;

use super::Record;
use crate::error::NexusError;

/// Cell spellings read as a missing value.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Int,
    Float,
    Bool,
    Str,
}

fn is_missing(cell: &str) -> bool {
    NA_TOKENS.contains(&cell)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_float(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Pick one type for a whole column. Integers only survive when no cell is
/// missing; otherwise the column widens to float.
pub(crate) fn infer_column<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut has_missing = false;
    let mut seen = false;
    let (mut all_int, mut all_num, mut all_bool) = (true, true, true);

    for cell in cells {
        if is_missing(cell) {
            has_missing = true;
            continue;
        }
        seen = true;
        all_int &= cell.trim().parse::<i64>().is_ok();
        all_num &= parse_float(cell).is_some();
        all_bool &= parse_bool(cell).is_some();
    }

    match (seen, has_missing) {
        (false, _) => ColumnKind::Str,
        (true, false) if all_int => ColumnKind::Int,
        _ if all_num => ColumnKind::Float,
        (true, _) if all_bool => ColumnKind::Bool,
        _ => ColumnKind::Str,
    }
}

fn to_value(cell: &str, kind: ColumnKind) -> Value {
    if is_missing(cell) {
        return Value::Null;
    }
    match kind {
        ColumnKind::Int => cell
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or(Value::Null),
        ColumnKind::Float => parse_float(cell)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnKind::Bool => parse_bool(cell).map(Value::Bool).unwrap_or(Value::Null),
        ColumnKind::Str => Value::String(cell.to_string()),
    }
}

/// Read a headed CSV into typed records, in file order.
pub(crate) fn read_records<R: Read>(name: &str, reader: R) -> Result<Vec<Record>, NexusError> {
    let csv_err = |source| NexusError::Csv {
        name: name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(NexusError::EmptyDataset(name.to_string()));
    }

    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_column(rows.iter().map(|row| row.get(col).unwrap_or(""))))
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .zip(kinds.iter())
                .zip(row.iter())
                .map(|((header, kind), cell)| (header.clone(), to_value(cell, *kind)))
                .collect::<Map<String, Value>>()
        })
        .collect();

    Ok(records)
}
