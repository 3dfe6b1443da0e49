//! Candidate rows and match results for the entity matcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::types::reservation::BookableDetail;

/// Which scoring rubric applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Hotel,
    Servicio,
    Programa,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::Servicio => "servicio",
            Self::Programa => "programa",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hotel" => Ok(Self::Hotel),
            "servicio" | "service" | "eventual" => Ok(Self::Servicio),
            "programa" | "program" | "package" => Ok(Self::Programa),
            _ => Err(EngineError::UnknownEntityKind(s.to_string())),
        }
    }
}

/// A flat record of textual fields from a catalog table or search index.
///
/// Field names depend on the entity kind (`nombre_hotel`, `ciudad`,
/// `tipo_habitacion`, ...). The same shape doubles as the match target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRow {
    fields: BTreeMap<String, String>,
}

impl CandidateRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(field, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (key, value) in pairs {
            row.insert(key, value);
        }
        row
    }

    /// Build a row from a flat JSON object.
    ///
    /// Strings are kept, numbers and booleans are stringified, anything else
    /// (null, arrays, nested objects) is skipped. Non-objects give an empty row.
    pub fn from_json(value: &Value) -> Self {
        let mut row = Self::new();
        if let Some(object) = value.as_object() {
            for (key, field) in object {
                let text = match field {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                row.insert(key.as_str(), text);
            }
        }
        row
    }

    /// Match target for a canonical detail, using the field names of `kind`.
    pub fn from_detail(detail: &BookableDetail, kind: EntityKind) -> Self {
        let mut row = Self::new();
        let name_key = match kind {
            EntityKind::Hotel => "nombre_hotel",
            EntityKind::Servicio | EntityKind::Programa => "nombre",
        };
        if let Some(name) = &detail.servicio {
            row.insert(name_key, name.as_str());
        }
        if let Some(city) = &detail.destino {
            row.insert("ciudad", city.as_str());
        }
        if kind == EntityKind::Hotel {
            if let Some(room) = &detail.descripcion {
                row.insert("tipo_habitacion", room.as_str());
            }
        }
        row
    }

    /// Set a field. Blank values are stored as absent.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, trimmed.to_string());
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// A non-blank field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// First present value among `keys`.
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// A candidate's position in the input list and its score (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    pub index: usize,
    pub score: f64,
}

/// The row the automation should act on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSelection {
    pub index: usize,
    pub score: f64,

    /// True when no candidate cleared the threshold and the fallback
    /// policy picked this row.
    pub fallback: bool,
}
