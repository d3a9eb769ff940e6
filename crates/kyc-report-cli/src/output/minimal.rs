use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in order of priority, then falls back to the
/// first field of the object.
pub fn print_minimal(value: &Value) {
    let priority_keys = [
        "risk_classification",
        "file",
        "status",
        "legal_name",
        "overall_score",
    ];

    let value = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match value {
        Value::Object(map) => {
            for key in &priority_keys {
                if let Some(val) = map.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
                return;
            }
            println!("{{}}");
        }
        // Company lists: one KvK number and name per line.
        Value::Array(arr) => {
            for item in arr {
                match (item.get("kvk_number"), item.get("company_name")) {
                    (Some(kvk), Some(name)) => {
                        println!("{}\t{}", format_minimal(kvk), format_minimal(name))
                    }
                    _ => println!("{}", format_minimal(item)),
                }
            }
        }
        _ => println!("{}", format_minimal(value)),
    }
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
