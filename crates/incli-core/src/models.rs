use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status name that marks an incident as finished.
pub const CLOSED_STATUS: &str = "Closed";

/// Anything returned by the API that carries a stable id and a human name.
pub trait Record {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

/// A user-defined typed custom resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Type this entry belongs to.
    #[serde(default)]
    pub catalog_type_id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Remaining fields, kept verbatim so output loses nothing.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A catalog type, i.e. the schema a set of catalog entries share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogType {
    pub id: String,
    pub name: String,
    /// Engine-level type name, e.g. `Custom["PagerdutyService"]`.
    #[serde(default)]
    pub type_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogType {
    /// `true` when `name` matches either the display name or the type name.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.type_name == name
    }
}

/// The status an incident is currently in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentStatus {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An operational event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub name: String,
    /// Human reference such as `INC-27`.
    pub reference: String,
    /// Dashboard URL, e.g. `https://app.incident.io/acme/incidents/27`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    #[serde(default)]
    pub incident_status: IncidentStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Incident {
    /// Whether the incident has reached the terminal status.
    pub fn is_closed(&self) -> bool {
        self.incident_status.name == CLOSED_STATUS
    }
}

impl Record for CatalogEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for CatalogType {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Incident {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Cursor for the following page; `None` on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page, treating an empty cursor as the end marker.
    pub fn new(records: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            records,
            next_cursor: next_cursor.filter(|c| !c.is_empty()),
        }
    }

    /// A final page with no continuation.
    pub fn last(records: Vec<T>) -> Self {
        Self {
            records,
            next_cursor: None,
        }
    }
}

/// Result of a lookup: a single record or a list of them.
///
/// Serialized untagged, so `One` prints as an object and `Many` as an array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Found<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Found<T> {
    /// Number of records carried.
    pub fn len(&self) -> usize {
        match self {
            Found::One(_) => 1,
            Found::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
