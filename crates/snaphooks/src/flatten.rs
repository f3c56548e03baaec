// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Decoding of snap option documents and flattening into dotted keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, DeserializeOwned, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};

#[cfg(test)]
#[path = "./flatten_test.rs"]
mod flatten_test;

/// An object node of a configuration document.
pub type ConfigTree = BTreeMap<String, ConfigValue>;

/// Flattened configuration: dotted key to encoded value.
pub type FlatConfig = BTreeMap<String, String>;

/// A single node of a configuration document.
///
/// Only strings, booleans, numbers and objects are accepted. Arrays and
/// nulls are rejected while decoding, so a decoded tree can always be
/// flattened.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Bool(bool),
    Number(serde_json::Number),
    Object(ConfigTree),
}

impl ConfigValue {
    /// Encode a leaf the way it appears in an override file.
    ///
    /// Returns `None` for objects.
    pub fn encode(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(encode_number(n)),
            Self::Object(_) => None,
        }
    }
}

/// Shortest round-trip decimal, never in exponent notation.
fn encode_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64's Display is shortest round-trip and never uses an exponent
        n.as_f64()
            .map(|f| f.to_string())
            .unwrap_or_else(|| n.to_string())
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ConfigValueVisitor)
    }
}

struct ConfigValueVisitor;

impl<'de> Visitor<'de> for ConfigValueVisitor {
    type Value = ConfigValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, boolean, number or object")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ConfigValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ConfigValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ConfigValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        serde_json::Number::from_f64(v)
            .map(ConfigValue::Number)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ConfigValue::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ConfigValue::String(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut tree = ConfigTree::new();
        while let Some((key, value)) = map.next_entry::<String, ConfigValue>()? {
            tree.insert(key, value);
        }
        Ok(ConfigValue::Object(tree))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(de::Error::invalid_type(Unexpected::Seq, &self))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(E::invalid_type(Unexpected::Unit, &self))
    }
}

/// Decode a JSON option document, reporting the path of any rejected node.
///
/// Blank input decodes as an empty object.
pub fn decode_document<T: DeserializeOwned>(json: &str) -> crate::Result<T> {
    let json = if json.trim().is_empty() { "{}" } else { json };
    let mut de = serde_json::Deserializer::from_str(json);
    serde_path_to_error::deserialize(&mut de).map_err(|err| crate::Error::UnsupportedNode {
        path: err.path().to_string(),
        error: err.into_inner(),
    })
}

/// Flatten `value` found under `key` into `out`.
///
/// `prefix` is the dotted path of the parent object, empty at the root.
pub fn flatten(prefix: &str, key: &str, value: &ConfigValue, out: &mut FlatConfig) {
    let path = if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    };

    match value {
        ConfigValue::Object(children) => {
            for (child_key, child) in children {
                flatten(&path, child_key, child, out);
            }
        }
        leaf => {
            if let Some(encoded) = leaf.encode() {
                out.insert(path, encoded);
            }
        }
    }
}

/// Flatten a whole configuration object.
pub fn flatten_tree(tree: &ConfigTree) -> FlatConfig {
    let mut out = FlatConfig::new();
    for (key, value) in tree {
        flatten("", key, value, &mut out);
    }
    out
}
