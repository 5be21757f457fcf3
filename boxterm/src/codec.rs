// JSON codec for terms
// Integers are always written as "__bigint__:<digits>" strings so that values
// beyond 2^53 survive JSON consumers that parse numbers as doubles.

use crate::runtime::bitstring::Bitstring;
use crate::runtime::values::Term;
use num_bigint::BigInt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use thiserror::Error;

pub const BIGINT_PREFIX: &str = "__bigint__:";

static BIGINT_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^__bigint__:(-?\d+)$").unwrap());

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Term is not serializable: {0}")]
    Unserializable(String),

    #[error("Malformed {kind} node: {reason}")]
    Malformed { kind: String, reason: String },

    #[error("Unknown term type: {0}")]
    UnknownType(String),
}

pub fn serialize(term: &Term) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&term_to_json(term)?)?)
}

/// Decodes a serialized term. Nesting depth is unbounded; deep input grows the
/// stack on the heap instead of hitting serde_json's recursion limit.
pub fn deserialize(text: &str) -> Result<Term, CodecError> {
    let mut json = serde_json::Deserializer::from_str(text);
    json.disable_recursion_limit();
    let value = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    json_to_term(&value)
}

/// Encodes an integer the way the wire format expects it.
pub fn encode_bigint(value: &BigInt) -> String {
    format!("{}{}", BIGINT_PREFIX, value)
}

/// Decodes a `__bigint__:` string, `None` when the text is not in that form.
pub fn decode_bigint(text: &str) -> Option<BigInt> {
    let captures = BIGINT_PATTERN.captures(text)?;
    captures[1].parse().ok()
}

pub fn term_to_json(term: &Term) -> Result<JsonValue, CodecError> {
    Ok(match term {
        Term::Atom(value) => json!({"type": "atom", "value": value}),
        Term::Integer(value) => json!({"type": "integer", "value": encode_bigint(value)}),
        Term::Float(value) => {
            if !value.is_finite() {
                return Err(CodecError::Unserializable(format!("non-finite float {}", value)));
            }
            json!({"type": "float", "value": value})
        }
        Term::String(value) => json!({"type": "string", "value": value}),
        Term::Bitstring(bits) => {
            let bits: Vec<u8> = bits.bits().iter().map(|b| u8::from(*b)).collect();
            json!({"type": "bitstring", "bits": bits})
        }
        Term::List(list) => json!({
            "type": "list",
            "data": terms_to_json(list.data())?,
            "isProper": list.is_proper(),
        }),
        Term::Tuple(items) => json!({"type": "tuple", "data": terms_to_json(items)?}),
        Term::Map(map) => {
            let mut data = Map::new();
            for (encoded, key, value) in map.iter_encoded() {
                data.insert(
                    encoded.clone(),
                    JsonValue::Array(vec![term_to_json(key)?, term_to_json(value)?]),
                );
            }
            json!({"type": "map", "data": data})
        }
        Term::AnonymousFunction(_) => {
            return Err(CodecError::Unserializable("anonymous function".to_string()))
        }
        Term::VariablePattern(name) => json!({"type": "variable_pattern", "name": name}),
        Term::MatchPlaceholder => json!({"type": "match_placeholder"}),
        Term::ConsPattern(cons) => json!({
            "type": "cons_pattern",
            "head": term_to_json(&cons.head)?,
            "tail": term_to_json(&cons.tail)?,
        }),
    })
}

fn terms_to_json(terms: &[Term]) -> Result<Vec<JsonValue>, CodecError> {
    terms.iter().map(term_to_json).collect()
}

pub fn json_to_term(value: &JsonValue) -> Result<Term, CodecError> {
    let node = value.as_object().ok_or_else(|| malformed("term", "expected an object"))?;
    let kind = node
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| malformed("term", "missing \"type\""))?;

    match kind {
        "atom" => Ok(Term::Atom(string_field(node, kind, "value")?)),
        "integer" => decode_integer(node.get("value")).map(Term::Integer),
        "float" => node
            .get("value")
            .and_then(JsonValue::as_f64)
            .map(Term::Float)
            .ok_or_else(|| malformed(kind, "\"value\" is not a number")),
        "string" => Ok(Term::String(string_field(node, kind, "value")?)),
        "bitstring" => {
            let bits = array_field(node, kind, "bits")?
                .iter()
                .map(|bit| match bit.as_u64() {
                    Some(0) => Ok(false),
                    Some(1) => Ok(true),
                    _ => Err(malformed(kind, "bits must be 0 or 1")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::Bitstring(Bitstring::from_bits(bits)))
        }
        "list" => {
            let mut data = json_to_terms(array_field(node, kind, "data")?)?;
            let is_proper = node
                .get("isProper")
                .and_then(JsonValue::as_bool)
                .ok_or_else(|| malformed(kind, "missing \"isProper\""))?;
            if is_proper {
                return Ok(Term::list(data));
            }
            match data.pop() {
                Some(tail) if !data.is_empty() && !tail.is_list() => {
                    Ok(Term::improper_list(data, tail))
                }
                _ => Err(malformed(kind, "improper list needs elements and a non-list tail")),
            }
        }
        "tuple" => Ok(Term::Tuple(json_to_terms(array_field(node, kind, "data")?)?)),
        "map" => {
            let data = node
                .get("data")
                .and_then(JsonValue::as_object)
                .ok_or_else(|| malformed(kind, "\"data\" is not an object"))?;
            let pairs = data
                .values()
                .map(|entry| match entry.as_array().map(Vec::as_slice) {
                    // Stored keys are recomputed from the decoded key term.
                    Some([key, value]) => Ok((json_to_term(key)?, json_to_term(value)?)),
                    _ => Err(malformed(kind, "entries must be [key, value] pairs")),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Term::map_from_pairs(pairs))
        }
        "variable_pattern" => Ok(Term::VariablePattern(string_field(node, kind, "name")?)),
        "match_placeholder" => Ok(Term::MatchPlaceholder),
        "cons_pattern" => {
            let head = node.get("head").ok_or_else(|| malformed(kind, "missing \"head\""))?;
            let tail = node.get("tail").ok_or_else(|| malformed(kind, "missing \"tail\""))?;
            Ok(Term::cons_pattern(json_to_term(head)?, json_to_term(tail)?))
        }
        "anonymous_function" => Err(CodecError::Unserializable("anonymous function".to_string())),
        other => Err(CodecError::UnknownType(other.to_string())),
    }
}

fn json_to_terms(values: &[JsonValue]) -> Result<Vec<Term>, CodecError> {
    values.iter().map(json_to_term).collect()
}

fn decode_integer(value: Option<&JsonValue>) -> Result<BigInt, CodecError> {
    match value {
        Some(JsonValue::String(text)) => {
            decode_bigint(text).ok_or_else(|| malformed("integer", "expected __bigint__:<digits>"))
        }
        Some(JsonValue::Number(number)) => {
            if let Some(i) = number.as_i64() {
                Ok(BigInt::from(i))
            } else if let Some(u) = number.as_u64() {
                Ok(BigInt::from(u))
            } else {
                Err(malformed("integer", "number is not an integer"))
            }
        }
        _ => Err(malformed("integer", "missing \"value\"")),
    }
}

fn string_field(node: &Map<String, JsonValue>, kind: &str, field: &str) -> Result<String, CodecError> {
    node.get(field)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed(kind, &format!("\"{}\" is not a string", field)))
}

fn array_field<'a>(
    node: &'a Map<String, JsonValue>,
    kind: &str,
    field: &str,
) -> Result<&'a Vec<JsonValue>, CodecError> {
    node.get(field)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| malformed(kind, &format!("\"{}\" is not an array", field)))
}

fn malformed(kind: &str, reason: &str) -> CodecError {
    CodecError::Malformed {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}
