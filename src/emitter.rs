//! Block-style text emitter for the converted document.
//!
//! This covers only the shapes the converter produces: nested mappings,
//! sequences of scalars or mappings, and multi-line strings. Mapping keys are
//! written as-is.

use serde_json::Value;
use std::borrow::Cow;

const MAPPING_INDENT: usize = 2;
const SEQUENCE_INDENT: usize = 4;
const SPECIAL_CHARS: &[char] = &[':', '#', '[', ']', '{', '}', '"', ',', '\n', '|', '>'];

/// Emit a value as indentation-based block text
pub fn emit(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(_) | Value::Array(_) => emit_mapping(&mut out, value, 0),
        scalar => {
            out.push_str(&stringify(scalar));
            out.push('\n');
        }
    }
    out
}

// Sequences reached in mapping position are keyed by index.
fn entries(value: &Value) -> Vec<(Cow<'_, str>, &Value)> {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v)).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (Cow::Owned(i.to_string()), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn emit_mapping(out: &mut String, value: &Value, indent: usize) {
    let spaces = " ".repeat(indent);

    for (key, value) in entries(value) {
        match value {
            Value::Null => continue,
            Value::Array(items) if items.is_empty() => {
                out.push_str(&format!("{}{}: []\n", spaces, key));
            }
            Value::Array(items) => {
                out.push_str(&format!("{}{}:\n", spaces, key));
                for item in items {
                    emit_sequence_item(out, item, indent);
                }
            }
            Value::Object(map) if map.is_empty() => {
                out.push_str(&format!("{}{}: {{}}\n", spaces, key));
            }
            Value::Object(_) => {
                out.push_str(&format!("{}{}:\n", spaces, key));
                emit_mapping(out, value, indent + MAPPING_INDENT);
            }
            Value::String(text) if text.contains('\n') => {
                out.push_str(&format!("{}{}: |\n", spaces, key));
                push_literal_lines(out, text, indent + MAPPING_INDENT);
            }
            scalar => {
                out.push_str(&format!("{}{}: {}\n", spaces, key, stringify(scalar)));
            }
        }
    }
}

fn emit_sequence_item(out: &mut String, item: &Value, indent: usize) {
    let spaces = " ".repeat(indent);

    match item {
        Value::Object(_) | Value::Array(_) => {
            let mut block = String::new();
            emit_mapping(&mut block, item, indent + SEQUENCE_INDENT);
            let block = block.trim_start();
            if block.is_empty() {
                let marker = if item.is_array() { "[]" } else { "{}" };
                out.push_str(&format!("{}  - {}\n", spaces, marker));
            } else {
                out.push_str(&format!("{}  - {}", spaces, block));
            }
        }
        Value::String(text) if text.contains('\n') => {
            out.push_str(&format!("{}  - |\n", spaces));
            push_literal_lines(out, text, indent + SEQUENCE_INDENT);
        }
        Value::Null => {
            out.push_str(&format!("{}  -\n", spaces));
        }
        scalar => {
            out.push_str(&format!("{}  - {}\n", spaces, stringify(scalar)));
        }
    }
}

fn push_literal_lines(out: &mut String, text: &str, indent: usize) {
    let spaces = " ".repeat(indent);
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| format!("{}{}", spaces, line))
        .collect();
    out.push_str(&lines.join("\n"));
    out.push('\n');
}

/// Render a value on a single line
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s).into_owned(),
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        other => compact(other),
    }
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn quote(text: &str) -> Cow<'_, str> {
    if text.contains(SPECIAL_CHARS) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\\\"")))
    } else {
        Cow::Borrowed(text)
    }
}
