use serde::{Deserialize, Deserializer, Serialize};

/// Absent and `null` fields both decode to the type's zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A CMS link to another document. Carried verbatim, never resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref", default, deserialize_with = "null_as_default")]
    pub reference: String,
    #[serde(rename = "_type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
    #[serde(rename = "_type", default, deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(rename = "_type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lat: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lng: f64,
}

/// An image block. `asset` points at the uploaded file; turning it into a URL
/// is left to consumers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "_key", default, deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(rename = "_type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub asset: Reference,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    #[serde(default, deserialize_with = "null_as_default")]
    pub facility_type: Reference,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facility_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<Image>,
}

/// A property document as served by the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(rename = "_id", default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: Slug,
    #[serde(default, deserialize_with = "null_as_default")]
    pub developer: Reference,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub map_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub geo_location: GeoLocation,
    #[serde(default, deserialize_with = "null_as_default")]
    pub min_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub facilities: Vec<Facility>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos: Vec<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub built: i64,
    /// CMS timestamp, kept as received.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl Property {
    pub fn slug(&self) -> &str {
        &self.slug.current
    }
}

/// Envelope returned by the CMS query endpoint.
///
/// Only a JSON object decodes. `result` is kept untyped so that each document
/// can be decoded on its own and a single bad record does not sink the whole
/// response. The metadata fields are informational: a value of an unexpected
/// type reads as `None` instead of failing the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct QueryResponse {
    pub result: Option<serde_json::Value>,
    /// Server-side query time in milliseconds.
    pub ms: Option<f64>,
    pub query: Option<String>,
}

impl From<serde_json::Map<String, serde_json::Value>> for QueryResponse {
    fn from(mut fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            result: fields.remove("result").filter(|v| !v.is_null()),
            ms: fields.get("ms").and_then(serde_json::Value::as_f64),
            query: match fields.remove("query") {
                Some(serde_json::Value::String(query)) => Some(query),
                _ => None,
            },
        }
    }
}

impl QueryResponse {
    /// The documents of the result set, or `None` when `result` is missing or
    /// is not an array.
    pub fn into_documents(self) -> Option<Vec<serde_json::Value>> {
        match self.result {
            Some(serde_json::Value::Array(documents)) => Some(documents),
            _ => None,
        }
    }
}
