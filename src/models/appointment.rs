use serde::Deserialize;
use serde_json::{Map, Value};

/// Snapshot of the booking fields reported by the backend.
///
/// Field order is preserved as received so the status panel lists fields in
/// the order the server chose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct AppointmentInfo {
    fields: Vec<(String, Option<String>)>,
}

impl AppointmentInfo {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for AppointmentInfo {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut fields = Vec::with_capacity(map.len());
        for (key, value) in map {
            let value = match value {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => {
                    return Err(format!(
                        "appointment field '{key}' must be a string or null, got {other}"
                    ))
                }
            };
            fields.push((key, value));
        }
        Ok(Self { fields })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusField {
    Complete(String),
    Missing,
}

impl StatusField {
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => StatusField::Complete(v.to_string()),
            _ => StatusField::Missing,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StatusField::Complete(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStatus {
    pub field: String,
    pub status: StatusField,
}

pub fn derive_status_fields(info: &AppointmentInfo) -> Vec<FieldStatus> {
    info.iter()
        .map(|(field, value)| FieldStatus {
            field: field.to_string(),
            status: StatusField::from_value(value),
        })
        .collect()
}

/// Vacuously true for an empty snapshot.
pub fn all_complete(fields: &[FieldStatus]) -> bool {
    fields.iter().all(|f| f.status.is_complete())
}
