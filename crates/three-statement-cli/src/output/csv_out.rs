use serde_json::{Map, Value};
use std::io;

use super::{flatten_row, period_sections};

/// Write output as CSV to stdout. Period sections are joined side by side,
/// one row per period, with each column prefixed by its section.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let records = csv_records(value);

    if let Err(e) = write_records(stdout.lock(), &records) {
        if !is_broken_pipe(&e) {
            eprintln!("CSV write error: {}", e);
        }
    }
}

fn csv_records(value: &Value) -> Vec<Vec<String>> {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if !period_sections(result).is_empty() => {
                period_records(result)
            }
            Some(Value::Object(result)) => field_records(result),
            _ => field_records(map),
        },
        _ => vec![vec![format_csv_value(value)]],
    }
}

fn write_records<W: io::Write>(out: W, records: &[Vec<String>]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in records {
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// A reader that closed the pipe early (`| head`) is not an error.
fn is_broken_pipe(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::BrokenPipe)
}

fn period_records(result: &Map<String, Value>) -> Vec<Vec<String>> {
    let sections = period_sections(result);
    let periods = sections.iter().map(|(_, rows)| rows.len()).max().unwrap_or(0);

    let mut header = vec!["year".to_string()];
    let mut body: Vec<Vec<String>> = (1..=periods).map(|y| vec![y.to_string()]).collect();

    for (section, rows) in sections {
        let flattened: Vec<Vec<(String, Value)>> = rows
            .iter()
            .filter_map(Value::as_object)
            .map(flatten_row)
            .collect();
        let columns: Vec<String> = flattened
            .first()
            .map(|cells| {
                cells
                    .iter()
                    .map(|(c, _)| c.clone())
                    .filter(|c| c != "year")
                    .collect()
            })
            .unwrap_or_default();

        header.extend(columns.iter().map(|c| format!("{section}.{c}")));
        for (i, line) in body.iter_mut().enumerate() {
            let cells = flattened.get(i);
            for column in &columns {
                let cell = cells
                    .and_then(|cells| cells.iter().find(|(c, _)| c == column))
                    .map(|(_, v)| format_csv_value(v))
                    .unwrap_or_default();
                line.push(cell);
            }
        }
    }

    let mut records = Vec::with_capacity(body.len() + 1);
    records.push(header);
    records.extend(body);
    records
}

fn field_records(map: &Map<String, Value>) -> Vec<Vec<String>> {
    let mut records = vec![vec!["field".to_string(), "value".to_string()]];
    for (key, val) in map {
        records.push(vec![key.clone(), format_csv_value(val)]);
    }
    records
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
