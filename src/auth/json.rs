use std::collections::HashMap;

/// The closed set of value shapes the backend ever serializes: token
/// headers and payloads, plus ad-hoc object/array bodies. Object fields
/// keep their insertion order when encoded.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

/// Encodes a value as compact JSON text. Strings are escaped for backslash
/// and double-quote only; object keys emit in insertion order.
pub fn encode(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => {
            if n.is_finite() && n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }
        }
        JsonValue::String(s) => encode_string(s),
        JsonValue::Array(items) => {
            let inner: Vec<String> = items.iter().map(encode).collect();
            format!("[{}]", inner.join(","))
        }
        JsonValue::Object(pairs) => {
            let inner: Vec<String> = pairs
                .iter()
                .map(|(k, v)| format!("{}:{}", encode_string(k), encode(v)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
    }
}

fn encode_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Decodes a flat JSON-object-shaped text into a string/string map.
///
/// This is a permissive scanner, not a validating parser: it strips the
/// outer braces, splits top-level fields on commas outside of quoted
/// strings (a single in-string flag toggled on every quote character, so
/// escaped quotes inside values are not handled), and splits each field on
/// its first colon. Keys and values are trimmed and de-quoted. Malformed or
/// non-object input yields an empty map; this function never fails.
///
/// Already-issued tokens depend on these exact splitting rules, so do not
/// tighten them.
pub fn decode_flat_object(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut s = text.trim();
    if s.starts_with('{') && s.ends_with('}') && s.len() >= 2 {
        s = &s[1..s.len() - 1];
    }

    let mut pairs: Vec<String> = Vec::new();
    let mut token = String::new();
    let mut in_string = false;
    for c in s.chars() {
        if c == '"' {
            in_string = !in_string;
        }
        if c == ',' && !in_string {
            pairs.push(std::mem::take(&mut token));
        } else {
            token.push(c);
        }
    }
    if !token.is_empty() {
        pairs.push(token);
    }

    for pair in pairs {
        if let Some((key, value)) = pair.split_once(':') {
            map.insert(strip_quotes(key).to_string(), strip_quotes(value).to_string());
        }
    }
    map
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encodes_object_in_insertion_order() {
        let value = JsonValue::Object(vec![
            ("alg".to_string(), "HS256".into()),
            ("typ".to_string(), "JWT".into()),
        ]);
        assert_eq!(encode(&value), r#"{"alg":"HS256","typ":"JWT"}"#);
    }

    #[test]
    fn encodes_scalars_and_arrays() {
        let value = JsonValue::Array(vec![
            JsonValue::Null,
            true.into(),
            JsonValue::Number(42.0),
            "x".into(),
        ]);
        assert_eq!(encode(&value), r#"[null,true,42,"x"]"#);
    }

    #[test]
    fn escapes_backslash_and_quote_only() {
        let value: JsonValue = r#"a"b\c"#.into();
        assert_eq!(encode(&value), r#""a\"b\\c""#);
    }

    #[test]
    fn decodes_flat_object() {
        let map = decode_flat_object(r#"{"email":"a@b.com","name":"Ana"}"#);
        assert_eq!(map.get("email").map(String::as_str), Some("a@b.com"));
        assert_eq!(map.get("name").map(String::as_str), Some("Ana"));
    }

    #[test]
    fn comma_inside_quoted_value_does_not_split() {
        let map = decode_flat_object(r#"{"title":"a, b","status":"Aberto"}"#);
        assert_eq!(map.get("title").map(String::as_str), Some("a, b"));
        assert_eq!(map.get("status").map(String::as_str), Some("Aberto"));
    }

    #[test]
    fn colon_inside_value_after_first_colon_is_kept() {
        let map = decode_flat_object(r#"{"location":"Bloco B: sala 2"}"#);
        assert_eq!(
            map.get("location").map(String::as_str),
            Some("Bloco B: sala 2")
        );
    }

    #[test]
    fn unquoted_scalars_are_kept_verbatim() {
        let map = decode_flat_object(r#"{"count":3,"flag":true}"#);
        assert_eq!(map.get("count").map(String::as_str), Some("3"));
        assert_eq!(map.get("flag").map(String::as_str), Some("true"));
    }

    #[test]
    fn malformed_input_yields_empty_map() {
        assert!(decode_flat_object("{not json").is_empty());
        assert!(decode_flat_object("").is_empty());
        assert!(decode_flat_object("[1,2,3]").is_empty());
    }

    #[test]
    fn fields_without_colon_are_skipped() {
        let map = decode_flat_object(r#"{"a":"1",garbage,"b":"2"}"#);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(map.get("b").map(String::as_str), Some("2"));
    }
}
