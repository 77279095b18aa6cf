use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Render command output as tables.
///
/// Scalar fields go into a Field/Value table; array fields (breakdowns,
/// equity points, trade lists) each get their own table underneath.
pub fn print_table(value: &Value) {
    for block in render(value) {
        println!("{}", block);
    }
}

fn render(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => render_envelope(result, map),
            None => render_object(map),
        },
        Value::Array(arr) => vec![array_table(arr)],
        _ => vec![value.to_string()],
    }
}

fn render_envelope(result: &Value, envelope: &Map<String, Value>) -> Vec<String> {
    let mut blocks = match result {
        Value::Object(res) => render_object(res),
        Value::Array(arr) => vec![array_table(arr)],
        other => vec![format_value(other)],
    };

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        let lines: Vec<String> = warnings
            .iter()
            .filter_map(Value::as_str)
            .map(|w| format!("  - {}", w))
            .collect();
        if !lines.is_empty() {
            blocks.push(format!("\nWarnings:\n{}", lines.join("\n")));
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        blocks.push(format!("\nMethodology: {}", meth));
    }
    blocks
}

fn render_object(map: &Map<String, Value>) -> Vec<String> {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.iter().any(Value::is_object) => {
                nested.push(format!("\n{}:\n{}", key, array_table(rows)));
            }
            Value::Object(inner) if inner.values().all(|v| !v.is_object() && !v.is_array()) => {
                for (k, v) in inner {
                    builder.push_record([format!("{}.{}", key, k), format_value(v)]);
                }
            }
            _ => builder.push_record([key.clone(), format_value(val)]),
        }
    }

    let mut blocks = vec![Table::from(builder).to_string()];
    blocks.extend(nested);
    blocks
}

fn array_table(arr: &[Value]) -> String {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            return "(empty)".to_string();
        }
        return arr.iter().map(format_value).collect::<Vec<_>>().join("\n");
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    Table::from(builder).to_string()
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
