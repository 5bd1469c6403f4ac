//! Residence-hall rooms as listed by the housing portal. Descriptive only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps a building name to the residential area it belongs to.
pub trait AreaLookup {
    fn residential_area(&self, building: &str) -> Option<String>;
}

impl AreaLookup for HashMap<String, String> {
    fn residential_area(&self, building: &str) -> Option<String> {
        self.get(building).cloned()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Row of the room in the portal's listing; `None` until placed
    row: Option<usize>,
    area: String,
    building: String,
    design: String,
    #[serde(rename = "type")]
    room_type: String,
    id: String,
}

impl Room {
    pub fn new(
        row: usize,
        area: impl Into<String>,
        building: impl Into<String>,
        design: impl Into<String>,
        room_type: impl Into<String>,
    ) -> Self {
        Self {
            row: Some(row),
            area: area.into(),
            building: building.into(),
            design: design.into(),
            room_type: room_type.into(),
            id: String::new(),
        }
    }

    /// Build a room whose area is resolved from its building.
    /// Unknown buildings get an empty area.
    pub fn in_building(
        row: usize,
        building: impl Into<String>,
        design: impl Into<String>,
        room_type: impl Into<String>,
        areas: &dyn AreaLookup,
    ) -> Self {
        let building = building.into();
        let area = areas.residential_area(&building).unwrap_or_default();
        Self::new(row, area, building, design, room_type)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn row(&self) -> Option<usize> {
        self.row
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn building(&self) -> &str {
        &self.building
    }

    pub fn design(&self) -> &str {
        &self.design
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}
