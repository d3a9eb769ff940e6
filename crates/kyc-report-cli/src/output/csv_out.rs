use serde_json::Value;
use std::io;

/// Keys whose array of objects becomes the CSV rows when present.
const ROW_KEYS: [&str; 3] = ["findings", "categories", "companies"];

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    // Unwrap the computation envelope when present.
    let value = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match value {
        Value::Object(map) => {
            let rows = ROW_KEYS.iter().find_map(|k| match map.get(*k) {
                Some(Value::Array(rows)) if !rows.is_empty() => Some(rows),
                _ => None,
            });
            if let Some(rows) = rows {
                write_array_csv(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Evidence lists and other nested data stay as compact JSON.
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
