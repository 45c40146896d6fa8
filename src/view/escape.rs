use serde_json::Value;

/// HTML-escape every string inside a value.
///
/// Numbers, booleans and nulls are returned unchanged; arrays and objects are
/// escaped element by element. Object keys are left as they are.
#[must_use]
pub fn escape_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(tera::escape_html(s)),
        Value::Array(items) => Value::Array(items.iter().map(escape_value).collect()),
        Value::Object(map) => {
            Value::Object(map.iter().map(|(k, v)| (k.clone(), escape_value(v))).collect())
        }
        other => other.clone(),
    }
}
