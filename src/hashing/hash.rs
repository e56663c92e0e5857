//! Helpers de hash: abstracción para poder cambiar de algoritmo sin tocar
//! el resto del motor. Actualmente SHA-256 en hex.
//!
//! `hash_json` hashea la forma canónica de un valor JSON: claves de objeto
//! ordenadas, sin espacios redundantes. Dos documentos estructuralmente
//! iguales hashean igual sin importar el orden de inserción.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Hashea bytes arbitrarios y devuelve hex.
pub fn hash_bytes(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    format!("{:x}", hasher.finalize())
}

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    hash_bytes(input.as_bytes())
}

/// Hashea la forma canónica de un valor JSON.
pub fn hash_json(value: &Value) -> String {
    let mut rendered = String::new();
    write_canonical(value, &mut rendered);
    hash_str(&rendered)
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::String(s) => write_quoted(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| *key);
            out.push('{');
            for (i, (key, entry)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_quoted(key, out);
                out.push(':');
                write_canonical(entry, out);
            }
            out.push('}');
        }
    }
}

fn write_quoted(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_str("CCO"), hash_str("CCO"));
        assert_ne!(hash_str("CCO"), hash_str("CCC"));
    }

    #[test]
    fn test_hash_is_hex_of_fixed_width() {
        let h = hash_str("");
        assert_eq!(h.len(), 64);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_json_hash_matches_canonical_text() {
        let value = json!({ "threshold": 5.0, "greater": true });
        assert_eq!(
            hash_json(&value),
            hash_str(r#"{"greater":true,"threshold":5.0}"#)
        );

        let nested = json!({ "z": [ { "y": "yes" }, null ], "a": { "x": 10 } });
        assert_eq!(
            hash_json(&nested),
            hash_str(r#"{"a":{"x":10},"z":[{"y":"yes"},null]}"#)
        );
    }

    #[test]
    fn test_json_hash_escapes_strings() {
        assert_eq!(hash_json(&json!("a\"b\n")), hash_str("\"a\\\"b\\n\""));
        assert_eq!(hash_json(&json!("\u{1}")), hash_str("\"\\u0001\""));
    }
}
