//! The asset record handed over by the map views.
//!
//! Records come from several vector-tile layers and REST endpoints, so every field is
//! optional, ids may arrive as numbers, and unknown fields are carried along untouched.
//! Accessors never fail; they fall back to placeholder strings instead.

use crate::CoreError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub pid_pg_parcels_251001: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub particella: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub parcel: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub comune: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub inspireid_localid_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_ownership", skip_serializing_if = "Option::is_none")]
    pub ownership: Option<Ownership>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipKind {
    Individual,
    Company,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    #[serde(rename = "type", default)]
    pub kind: OwnershipKind,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub ssn: Option<String>,
    #[serde(
        rename = "vatNumber",
        alias = "vat_number",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub vat_number: Option<String>,
}

impl Ownership {
    pub fn individual(name: &str, surname: &str, ssn: Option<&str>) -> Self {
        Self {
            kind: OwnershipKind::Individual,
            name: Some(name.to_string()),
            surname: Some(surname.to_string()),
            ssn: ssn.map(str::to_string),
            vat_number: None,
        }
    }

    pub fn company(vat_number: Option<&str>) -> Self {
        Self {
            kind: OwnershipKind::Company,
            vat_number: vat_number.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn name_or_na(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn surname_or_na(&self) -> &str {
        self.surname.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

impl AssetRecord {
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = Some(ownership);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        Ok(serde_json::from_value(value)?)
    }

    fn generic_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.pid_pg_parcels_251001.as_deref())
    }

    /// Identity of the asset node inside a graph.
    pub fn graph_id(&self) -> &str {
        self.generic_id().unwrap_or("asset-1")
    }

    pub fn parcel(&self) -> Option<&str> {
        self.particella.as_deref().or(self.parcel.as_deref())
    }

    pub fn parcel_label(&self) -> &str {
        self.parcel().unwrap_or("Unknown")
    }

    pub fn display_id(&self) -> &str {
        self.generic_id().unwrap_or(NOT_AVAILABLE)
    }

    pub fn municipality_name(&self) -> Option<&str> {
        self.comune.as_deref().or(self.municipality.as_deref())
    }

    pub fn location(&self) -> &str {
        self.municipality_name()
            .or(self.inspireid_localid_2.as_deref())
            .unwrap_or(NOT_AVAILABLE)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

/// Empty values (`null`, `false`, `0`, `""`) mean no ownership. Anything else counts as
/// ownership of an unrecognised kind unless it parses as an [`Ownership`] object.
fn lenient_ownership<'de, D>(deserializer: D) -> Result<Option<Ownership>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => None,
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v @ Value::Object(_)) => Some(serde_json::from_value(v).unwrap_or_default()),
        Some(_) => Some(Ownership::default()),
    })
}
