use serde_json::Value;

/// Key figures printed by `--output minimal`, in priority order. Looked up
/// in the result, then in its summary.
const PRIORITY_KEYS: [&str; 3] = ["ending_cash", "ending_revolver", "total_years"];

/// Print just the closing position: one `key: value` line per priority
/// field found. Ratio output has no summary, so the last period of each
/// ratio group is printed instead.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for line in minimal_lines(result_obj) {
        println!("{}", line);
    }
}

fn minimal_lines(result: &Value) -> Vec<String> {
    let Value::Object(map) = result else {
        return vec![format_minimal(result)];
    };

    let summary = map.get("summary").and_then(Value::as_object);
    let found: Vec<String> = PRIORITY_KEYS
        .iter()
        .filter_map(|key| {
            map.get(*key)
                .or_else(|| summary.and_then(|s| s.get(*key)))
                .filter(|v| !v.is_null())
                .map(|v| format!("{}: {}", key, format_minimal(v)))
        })
        .collect();
    if !found.is_empty() {
        return found;
    }

    // Last period of every per-period section
    let mut lines = Vec::new();
    for (section, val) in map {
        if let Some(Value::Object(last)) = val.as_array().and_then(|rows| rows.last()) {
            for (key, cell) in last.iter().filter(|(k, _)| k.as_str() != "year") {
                lines.push(format!("{}.{}: {}", section, key, format_minimal(cell)));
            }
        }
    }
    if !lines.is_empty() {
        return lines;
    }

    map.iter()
        .next()
        .map(|(key, val)| vec![format!("{}: {}", key, format_minimal(val))])
        .unwrap_or_default()
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_projection_prints_closing_position() {
        let result = json!({
            "balance_sheets": [{ "year": 1, "cash": "462.5" }],
            "summary": { "total_years": 1, "ending_cash": "462.5", "ending_revolver": "0" }
        });
        assert_eq!(
            minimal_lines(&result),
            vec!["ending_cash: 462.5", "ending_revolver: 0", "total_years: 1"]
        );
    }

    #[test]
    fn test_ratios_print_last_period() {
        let result = json!({
            "liquidity": [
                { "year": 1, "quick_ratio": "2" },
                { "year": 2, "quick_ratio": null }
            ]
        });
        assert_eq!(minimal_lines(&result), vec!["liquidity.quick_ratio: n/a"]);
    }
}
