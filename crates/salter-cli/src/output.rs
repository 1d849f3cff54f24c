//! Terminal rendering for endpoint payloads.

use serde_json::Value;

use crate::error::CliError;

pub fn render_json(value: &Value, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

pub fn render_status(status: &Value) {
    let is_open = status
        .get("isOpen")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN");
    let as_of = status.get("asOf").and_then(Value::as_str).unwrap_or("");
    println!("Market status: {is_open}");
    if !as_of.is_empty() {
        println!("As of: {as_of}");
    }
}

pub fn render_index(index: &Value) {
    // The index endpoint may return a list of index records; prefer the
    // headline "NEPSE Index" entry when it does.
    let record = match index {
        Value::Array(items) => items
            .iter()
            .find(|item| item.get("index").and_then(Value::as_str) == Some("NEPSE Index"))
            .or_else(|| items.first()),
        other => Some(other),
    };
    let Some(record) = record else {
        println!("NEPSE index: no data");
        return;
    };

    let current = record.get("currentValue").unwrap_or(&Value::Null);
    let change = record.get("change").unwrap_or(&Value::Null);
    let per_change = record.get("perChange").unwrap_or(&Value::Null);
    println!("NEPSE index: {current} ({change}, {per_change}%)");
}

pub fn render_top_table(title: &str, rows: &Value, limit: usize) {
    println!("\n{title}:");
    println!("{:<12} {:<12} {:<10}", "Symbol", "LTP", "Change %");
    println!("{}", "-".repeat(36));

    let Some(rows) = rows.as_array() else {
        println!("(no data)");
        return;
    };
    for row in rows.iter().take(limit) {
        let symbol = row.get("symbol").and_then(Value::as_str).unwrap_or("?");
        let ltp = row.get("ltp").unwrap_or(&Value::Null);
        let change = row.get("percentageChange").unwrap_or(&Value::Null);
        println!("{symbol:<12} {:<12} {:<10}", ltp.to_string(), change.to_string());
    }
}

pub fn render_summary(summary: &Value) {
    println!("Market summary:");
    let Some(items) = summary.as_array() else {
        println!("{summary}");
        return;
    };
    for item in items {
        let detail = item.get("detail").and_then(Value::as_str).unwrap_or("");
        let value = item.get("value").unwrap_or(&Value::Null);
        println!("  {detail}: {value}");
    }
}

/// Truncate a JSON array in place; passthrough for non-arrays.
pub fn truncated(value: Value, limit: usize) -> Value {
    match value {
        Value::Array(mut items) => {
            items.truncate(limit);
            Value::Array(items)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truncated_caps_arrays_and_passes_objects() {
        let capped = truncated(json!([1, 2, 3, 4]), 2);
        assert_eq!(capped, json!([1, 2]));

        let object = truncated(json!({"a": 1}), 2);
        assert_eq!(object, json!({"a": 1}));
    }
}
