pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result sections that hold one object per period, in output order.
pub(crate) fn period_sections(result: &Map<String, Value>) -> Vec<(&str, &[Value])> {
    result
        .iter()
        .filter_map(|(key, val)| match val {
            Value::Array(rows) if rows.iter().all(Value::is_object) && !rows.is_empty() => {
                Some((key.as_str(), rows.as_slice()))
            }
            _ => None,
        })
        .collect()
}

/// Flatten one period row into (column, cell) pairs. A nested object of
/// booleans collapses to the names that are set; any other nested object
/// spreads into `parent.child` columns.
pub(crate) fn flatten_row(row: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut cells = Vec::with_capacity(row.len());
    for (key, val) in row {
        match val {
            Value::Object(inner) if inner.values().all(Value::is_boolean) => {
                let set: Vec<&str> = inner
                    .iter()
                    .filter(|(_, v)| v.as_bool() == Some(true))
                    .map(|(k, _)| k.as_str())
                    .collect();
                cells.push((key.clone(), Value::String(set.join(" "))));
            }
            Value::Object(inner) => {
                for (sub, v) in inner {
                    cells.push((format!("{key}.{sub}"), v.clone()));
                }
            }
            _ => cells.push((key.clone(), val.clone())),
        }
    }
    cells
}

/// "income_statements" -> "Income Statements"
pub(crate) fn section_title(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
