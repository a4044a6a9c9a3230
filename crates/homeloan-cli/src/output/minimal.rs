use serde_json::Value;

/// Display labels holding the headline answer of each calculator.
const HEADLINE_LABELS: [&str; 5] = [
    "Monthly repayment",
    "Payoff time",
    "Total costs",
    "Outcome",
    "Maximum purchase price",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(lines)) = result_obj.get("display_results") {
        let headline = lines.iter().find(|line| {
            line.get("label")
                .and_then(Value::as_str)
                .is_some_and(|l| HEADLINE_LABELS.contains(&l))
        });
        if let Some(text) = headline.and_then(|l| l.get("value")).and_then(Value::as_str) {
            println!("{}", text);
            return;
        }
    }

    // Schedules: the scheduled monthly payment
    if result_obj.get("periods").is_some() {
        if let Some(payment) = result_obj.get("payment") {
            println!("{}", format_minimal(payment));
            return;
        }
    }

    if let Value::Object(map) = result_obj {
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
