//! Shared vocabulary for the request pipeline.
//!
//! # Design
//! Everything here is plain owned data (`String`, `Vec`, `HashMap`) so
//! descriptors can be cloned into completion callbacks and crossed between
//! threads without lifetime concerns. `Params` is Vec-backed rather than a
//! `HashMap` because query-string order is observable in the composed URL
//! and must match insertion order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header map used for defaults, per-call overrides, and responses.
pub type Headers = HashMap<String, String>;

/// Free-form per-request metadata bag (`custom` in the configuration).
pub type Custom = HashMap<String, Value>;

/// HTTP method for a request. `Get` is the configuration default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Get
    }
}

/// How the transport should treat the response body. `Json` asks it to
/// parse the body once; `Text` leaves it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Json,
    Text,
}

impl Default for DataType {
    fn default() -> Self {
        DataType::Json
    }
}

/// Expected shape of the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    ArrayBuffer,
}

impl Default for ResponseType {
    fn default() -> Self {
        ResponseType::Text
    }
}

/// Request body handed to the transport as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
    Bytes(Vec<u8>),
}

/// One file entry for multi-file uploads. `name` overrides the spec-level
/// form field name for this entry when set.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: Option<String>,
    pub path: String,
}

/// Query parameters with insertion-ordered iteration.
///
/// Inserting an existing key overwrites its value in place, keeping the
/// key's original position in the encoded query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_preserve_insertion_order() {
        let mut params = Params::new();
        params.insert("z", "1");
        params.insert("a", "2");
        params.insert("m", "3");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn params_insert_existing_key_keeps_position() {
        let mut params = Params::new();
        params.insert("a", "1");
        params.insert("b", "2");
        params.insert("a", "replaced");
        let pairs: Vec<(&str, &Value)> = params.iter().collect();
        assert_eq!(pairs[0].0, "a");
        assert_eq!(pairs[0].1, &Value::from("replaced"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn method_serializes_uppercase() {
        assert_eq!(serde_json::to_value(Method::Get).unwrap(), "GET");
        assert_eq!(Method::Patch.as_str(), "PATCH");
    }

    #[test]
    fn data_type_serializes_lowercase() {
        assert_eq!(serde_json::to_value(DataType::Json).unwrap(), "json");
        assert_eq!(
            serde_json::to_value(ResponseType::ArrayBuffer).unwrap(),
            "arraybuffer"
        );
    }
}
