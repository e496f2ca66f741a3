use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Columns shown when a row looks like a suggestion.
const SUGGESTION_COLUMNS: [&str; 9] = [
    "id",
    "item_description",
    "current_category",
    "suggested_category",
    "suggestion_type",
    "priority",
    "confidence",
    "tax_impact",
    "status",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else if let Some(Value::Array(list)) = map.get("suggestions") {
                // review output: the reviewed suggestion, then the whole list
                if let Some(reviewed) = map.get("suggestion") {
                    print_flat_object(reviewed);
                    println!();
                }
                print_array_table(list);
            } else if !map.is_empty() && map.values().all(Value::is_array) {
                for (key, val) in map {
                    println!("{}:", key);
                    if let Value::Array(list) = val {
                        print_array_table(list);
                    }
                }
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => {
            if let Some(Value::Array(list)) = res_map.get("suggestions") {
                print_array_table(list);
            }
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in res_map {
                if key == "suggestions" {
                    continue;
                }
                if let Value::Object(inner) = val {
                    for (k, v) in inner {
                        builder.push_record([format!("{}.{}", key, k), format_value(v)]);
                    }
                } else {
                    builder.push_record([key.clone(), format_value(val)]);
                }
            }
            println!("{}", Table::from(builder));
        }
        _ => print_flat_object(&Value::Object(envelope.clone())),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = if first.contains_key("suggestion_type") {
            SUGGESTION_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else {
            first.keys().cloned().collect()
        };

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
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
