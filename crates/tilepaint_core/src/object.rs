//! Objects placed on object layers

use crate::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An object placed on an object layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Unique identifier for this object
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    /// Type name (e.g., "Spawn", "Chest")
    pub type_name: String,
    /// Position in map pixel coordinates [x, y]
    pub position: [f32; 2],
    #[serde(default)]
    pub properties: Properties,
}

impl MapObject {
    pub fn new(type_name: impl Into<String>, position: [f32; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            type_name: type_name.into(),
            position,
            properties: Properties::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(key.into(), value.into());
    }
}
