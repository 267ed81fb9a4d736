use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a field/value table using the tabled crate.
///
/// Estimate results arrive in the computation envelope (`result` object plus
/// `warnings` and `methodology`); valuation results are flat objects. Both
/// render as a two-column table.
pub fn print_table(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    let body = map.get("result").unwrap_or(value);
    print_fields(body);

    if let Some(Value::Array(warnings)) = map.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = map.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_fields(value: &Value) {
    let Some(map) = value.as_object() else {
        println!("{}", value);
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
