use serde_json::Value;

/// Headline field for each command, checked in order.
const PRIORITY_KEYS: [&str; 10] = [
    "pnl",
    "position_size",
    "ratio",
    "score",
    "market",
    "win_rate",
    "balance",
    "max_drawdown",
    "exported",
    "deleted",
];

/// Print only the headline value of a command's output.
///
/// Falls back to the first field of the result object when none of the
/// well-known keys is present.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Analytics nests its headline numbers one level down
    let result_obj = result_obj
        .as_object()
        .and_then(|m| m.get("summary"))
        .unwrap_or(result_obj);

    if let Value::Object(map) = result_obj {
        if let Some(val) = PRIORITY_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find(|v| !v.is_null())
        {
            return format_minimal(val);
        }
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }
    if let Value::Array(items) = result_obj {
        return items.len().to_string();
    }
    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_picks_priority_key_from_envelope() {
        let v = json!({"result": {"risk_amount": "100", "risk_per_pip": null, "position_size": null, "ratio": "2"}});
        assert_eq!(minimal_line(&v), "2");
    }

    #[test]
    fn test_analytics_summary() {
        let v = json!({"result": {"summary": {"total_trades": 3, "win_rate": "66.67"}}});
        assert_eq!(minimal_line(&v), "66.67");
    }

    #[test]
    fn test_list_counts_rows() {
        assert_eq!(minimal_line(&json!([{"id": "a"}, {"id": "b"}])), "2");
    }
}
