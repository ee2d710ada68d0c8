//! Node identifiers for RNA hypergraphs.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a nucleotide position.
///
/// Foldings produced by different tools label nucleotides either by their
/// 1-based sequence position or by a string name. Both forms are accepted and
/// must be stable across the foldings being compared.
///
/// Serialized untagged: [`NodeId::Int`] as a JSON number, [`NodeId::Name`] as
/// a JSON string. On input, strings holding a decimal integer are read back as
/// [`NodeId::Int`] so that integer ids survive use as JSON object keys.
/// Integer ids order before named ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Numeric position.
    Int(i64),
    /// Named position.
    Name(String),
}

impl NodeId {
    /// Get the numeric position, if this is an integer id.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Name(_) => None,
        }
    }
}

struct NodeIdVisitor;

impl<'de> Visitor<'de> for NodeIdVisitor {
    type Value = NodeId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or string node id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NodeId, E> {
        Ok(NodeId::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NodeId, E> {
        i64::try_from(v)
            .map(NodeId::Int)
            .map_err(|_| E::custom(format!("node id {} out of range", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NodeId, E> {
        Ok(v.parse::<i64>()
            .map(NodeId::Int)
            .unwrap_or_else(|_| NodeId::Name(v.to_string())))
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeIdVisitor)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Name(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<u32> for NodeId {
    fn from(n: u32) -> Self {
        Self::Int(n as i64)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::Name(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}
