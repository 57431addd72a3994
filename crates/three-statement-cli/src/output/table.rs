use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::{flatten_row, period_sections, section_title};

/// Decimal places shown in table cells; JSON and CSV keep full precision.
const DISPLAY_DP: u32 = 4;

/// Format output as tables using the tabled crate: one table per
/// statement or ratio group with a row per period, then the summary.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_tables(result, map),
            _ => print_flat_object(map),
        },
        _ => println!("{}", value),
    }
}

fn print_result_tables(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    for (key, rows) in period_sections(result) {
        println!("{}", section_title(key));
        println!("{}\n", period_table(rows));
    }

    if let Some(Value::Object(summary)) = result.get("summary") {
        println!("Summary");
        print_flat_object(summary);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn period_table(rows: &[Value]) -> Table {
    let mut builder = Builder::default();

    for (i, row) in rows.iter().filter_map(Value::as_object).enumerate() {
        let cells = flatten_row(row);
        if i == 0 {
            builder.push_record(cells.iter().map(|(column, _)| column.clone()));
        }
        builder.push_record(cells.iter().map(|(_, v)| format_value(v)));
    }

    Table::from(builder)
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    let table = Table::from(builder);
    println!("{}", table);
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => match Decimal::from_str(s) {
            Ok(d) => d.round_dp(DISPLAY_DP).normalize().to_string(),
            Err(_) if s.is_empty() => "-".to_string(),
            Err(_) => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
