//! Document types
//!
//! Wire shapes for resources, references and page envelopes.

use crate::types::{JsonObject, JsonValue};
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use std::collections::HashMap;

/// Pointer to a resource by `(type, id)`; the target may be absent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Reference {
    /// Resource type
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource id, normalized to a string
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

impl Reference {
    /// Create a reference
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Linkage of a named relationship
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawRelationship")]
pub enum Relationship {
    /// `null`, missing, or a relationship object without `data`
    #[default]
    Empty,
    /// To-one relationship
    One(Reference),
    /// To-many relationship
    Many(Vec<Reference>),
}

static EMPTY_RELATIONSHIP: Relationship = Relationship::Empty;

impl Relationship {
    /// The single reference of a to-one relationship
    pub fn as_one(&self) -> Option<&Reference> {
        match self {
            Relationship::One(r) => Some(r),
            _ => None,
        }
    }

    /// All references, in document order
    pub fn refs(&self) -> &[Reference] {
        match self {
            Relationship::Empty => &[],
            Relationship::One(r) => std::slice::from_ref(r),
            Relationship::Many(refs) => refs,
        }
    }

    /// Check if the relationship carries no reference
    pub fn is_empty(&self) -> bool {
        self.refs().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLinkage {
    One(Reference),
    Many(Vec<Reference>),
}

// `Bare` must be tried first: a bare `{type, id}` would otherwise match
// `Wrapped` with `data` defaulted to None.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRelationship {
    Bare(Option<RawLinkage>),
    Wrapped {
        #[serde(default)]
        data: Option<RawLinkage>,
    },
}

impl From<RawRelationship> for Relationship {
    fn from(raw: RawRelationship) -> Self {
        let linkage = match raw {
            RawRelationship::Bare(l) | RawRelationship::Wrapped { data: l } => l,
        };
        match linkage {
            None => Relationship::Empty,
            Some(RawLinkage::One(r)) => Relationship::One(r),
            Some(RawLinkage::Many(refs)) => Relationship::Many(refs),
        }
    }
}

/// A typed, identified record with attributes and named relationships
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resource {
    /// Resource type
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource id, normalized to a string
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Attribute values
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: JsonObject,
    /// Named relationships
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: HashMap<String, Relationship>,
}

impl Resource {
    /// Create a resource with no attributes or relationships
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            attributes: JsonObject::new(),
            relationships: HashMap::new(),
        }
    }

    /// Reference pointing at this resource
    pub fn reference(&self) -> Reference {
        Reference::new(&self.kind, &self.id)
    }

    /// Named relationship, `Empty` when absent
    pub fn relationship(&self, name: &str) -> &Relationship {
        self.relationships.get(name).unwrap_or(&EMPTY_RELATIONSHIP)
    }

    /// Attribute value; explicit `null` counts as absent
    pub fn attr(&self, name: &str) -> Option<&JsonValue> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    /// Raw attribute value, or `default` when absent
    pub fn attr_or(&self, name: &str, default: JsonValue) -> JsonValue {
        self.attr(name).cloned().unwrap_or(default)
    }

    /// Attribute rendered as text, empty when absent
    pub fn attr_str(&self, name: &str) -> String {
        value_text(self.attr(name))
    }

    /// Attribute coerced for arithmetic, see [`coerce_amount`]
    pub fn attr_amount(&self, name: &str) -> f64 {
        self.attr(name).map_or(0.0, coerce_amount)
    }
}

/// Render a value as text; `None` and `null` become the empty string
pub fn value_text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Coerce a value taking part in a sum
///
/// Numbers pass through, numeric strings are parsed, everything else is 0.
pub fn coerce_amount(value: &JsonValue) -> f64 {
    match value {
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// One API response: primary resources plus side-loaded ones
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Page {
    /// Page number this envelope was fetched as (1-based)
    #[serde(skip)]
    pub number: u32,
    /// Primary resources (`data`)
    #[serde(rename = "data", default, deserialize_with = "null_as_default")]
    pub primary: Vec<Resource>,
    /// Side-loaded resources
    #[serde(default, deserialize_with = "null_as_default")]
    pub included: Vec<Resource>,
}

impl Page {
    /// Number of primary resources
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Check if the page has no primary resources
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// `createdAt` of the last primary resource, used for progress logs
    pub fn last_created_at(&self) -> String {
        self.primary
            .last()
            .map(|r| r.attr_str("createdAt"))
            .unwrap_or_default()
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "resource id must be a string or number, got {other}"
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
