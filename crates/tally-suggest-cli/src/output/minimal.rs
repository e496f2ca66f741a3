use serde_json::Value;

/// Key answer fields, most specific first. `analytics` is searched too so a
/// `generate` run reduces to its total tax impact.
const PRIORITY_KEYS: [&str; 7] = [
    "tax_impact",
    "difference",
    "tax_benefit",
    "total_tax_impact",
    "category",
    "depreciable",
    "status",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result").or_else(|| m.get("suggestion")))
        .unwrap_or(value);

    if let Value::Array(list) = result_obj {
        println!("{}", list.len());
        return;
    }

    if let Value::Object(map) = result_obj {
        let nested = map.get("analytics").and_then(Value::as_object);
        for key in &PRIORITY_KEYS {
            let hit = map
                .get(*key)
                .or_else(|| nested.and_then(|n| n.get(*key)));
            if let Some(val) = hit {
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
    }

    println!("{}", format_minimal(result_obj));
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
