//! Pure URL composition: absolute-URL detection, query encoding, and
//! base + path + query merging.
//!
//! # Design
//! Query values are `serde_json::Value`s so callers can pass numbers and
//! nested structures without pre-stringifying. Encoding policy: strings
//! encode their raw contents, numbers and booleans use their display form,
//! `null` encodes as the empty string, and objects/arrays are serialized
//! to JSON before percent-encoding. Keys are percent-encoded as well, so
//! encoding is total and never fails.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::Value;

use crate::types::Params;

/// Characters left unescaped by `encodeURIComponent`: alphanumerics plus
/// `- _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static ABSOLUTE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[\w.\-]+").expect("absolute-url pattern is valid"));

/// True iff `url` starts with an `http://` or `https://` scheme followed by
/// a host. A scheme-level check, not full URI validation.
pub fn is_absolute(url: &str) -> bool {
    ABSOLUTE_URL.is_match(url)
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => encode_component(s),
        Value::Null => String::new(),
        Value::Bool(_) | Value::Number(_) => encode_component(&value.to_string()),
        // Nested structures are serialized to JSON, then percent-encoded.
        Value::Array(_) | Value::Object(_) => {
            encode_component(&serde_json::to_string(value).unwrap_or_default())
        }
    }
}

/// Encode `params` as `key=value` pairs joined with `&`, in insertion
/// order. An empty map yields the empty string.
pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_value(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Compose the final request URL: prefix `base_url` unless `url` is
/// already absolute, then append the encoded `params` with `?` or `&`
/// depending on whether the composed URL already carries a query string.
pub fn merge_url(url: &str, base_url: &str, params: &Params) -> String {
    let mut merged = if is_absolute(url) {
        url.to_string()
    } else {
        format!("{base_url}{url}")
    };
    if !params.is_empty() {
        let encoded = encode_params(params);
        let separator = if merged.contains('?') { '&' } else { '?' };
        merged.push(separator);
        merged.push_str(&encoded);
    }
    merged
}
