//! Room model.
//!
//! Rooms are partitioned by [`SessionKind`]: lectures go to lecture rooms,
//! labs to labs. Capacity is carried for reporting but not yet used as a
//! placement constraint.

use serde::{Deserialize, Serialize};

use super::SessionKind;

/// A teaching room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Which sessions this room hosts.
    pub kind: SessionKind,
    /// Seats.
    pub capacity: u32,
}

impl Room {
    /// Creates a room with zero capacity.
    pub fn new(id: impl Into<String>, kind: SessionKind) -> Self {
        Self {
            id: id.into(),
            kind,
            capacity: 0,
        }
    }

    /// Creates a lecture room.
    pub fn lecture(id: impl Into<String>) -> Self {
        Self::new(id, SessionKind::Lecture)
    }

    /// Creates a lab.
    pub fn lab(id: impl Into<String>) -> Self {
        Self::new(id, SessionKind::Lab)
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Normalizes a raw row. Returns `None` for a blank room id.
    pub fn from_row(row: &RoomRow) -> Option<Self> {
        let id = row.room.trim();
        if id.is_empty() {
            return None;
        }
        Some(Self {
            id: id.to_string(),
            kind: SessionKind::from_label(&row.kind),
            capacity: row.capacity.trim().parse().unwrap_or(0),
        })
    }
}

/// A room row as it arrives from a tabular source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoomRow {
    #[serde(rename = "Room")]
    pub room: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Capacity", default)]
    pub capacity: String,
}

/// Room identifiers of the given kind, in input order.
pub fn rooms_of_kind(rooms: &[Room], kind: SessionKind) -> Vec<&str> {
    rooms
        .iter()
        .filter(|r| r.kind == kind)
        .map(|r| r.id.as_str())
        .collect()
}
