//! Placement (solution) model.
//!
//! A placement puts one session of a course requirement on a
//! (day, start slot, duration, room, faculty) tuple. A [`Timetable`] is the
//! ordered list of placements produced by one scheduling run.
//!
//! Placements committed despite residual clashes are tagged
//! [`PlacementStatus::Adjusted`] and carry the exact list of rules they
//! broke at commit time.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::{SessionKind, WeekGrid};

/// Classification of clashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationType {
    /// The room is already taken in one of the block's slots.
    RoomOccupied,
    /// The faculty member already teaches in one of the block's slots.
    FacultyBusy,
    /// The class-section already sits in one of the block's slots.
    ClassBusy,
    /// The class-section already has this subject on this day.
    SubjectRepeated,
    /// The class-section would exceed its daily hour cap.
    ClassDailyLimit,
    /// The faculty member would exceed their daily hour cap.
    FacultyDailyLimit,
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationType::RoomOccupied => "room occupied",
            ViolationType::FacultyBusy => "faculty busy",
            ViolationType::ClassBusy => "class busy",
            ViolationType::SubjectRepeated => "subject repeated",
            ViolationType::ClassDailyLimit => "class daily limit",
            ViolationType::FacultyDailyLimit => "faculty daily limit",
        };
        f.write_str(name)
    }
}

/// One broken rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Which rule.
    pub violation_type: ViolationType,
    /// The room, faculty or class-section the rule is about.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome tag of a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementStatus {
    /// Committed with no violations.
    Scheduled,
    /// Committed despite residual violations.
    Adjusted,
}

/// A scheduled session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the originating requirement in the run's input.
    pub requirement: usize,
    /// Class-section identifier.
    pub class_section: String,
    /// Subject name.
    pub subject: String,
    /// Subject code.
    pub subject_code: String,
    /// Session kind.
    pub kind: SessionKind,
    /// Faculty member teaching this session.
    pub faculty: String,
    /// Room.
    pub room: String,
    /// Day index into the grid.
    pub day: usize,
    /// First slot index into the grid.
    pub start_slot: usize,
    /// Number of consecutive slots.
    pub duration: u32,
    /// Clean or adjusted.
    pub status: PlacementStatus,
    /// Rules broken at commit time (empty when `Scheduled`).
    pub violations: Vec<Violation>,
}

impl Placement {
    /// Slot indices occupied by this placement.
    pub fn slots(&self) -> std::ops::Range<usize> {
        self.start_slot..self.start_slot + self.duration as usize
    }

    /// Whether this placement occupies `(day, slot)`.
    pub fn covers(&self, day: usize, slot: usize) -> bool {
        self.day == day && self.slots().contains(&slot)
    }

    /// Number of violations at commit time.
    #[inline]
    pub fn clash_count(&self) -> usize {
        self.violations.len()
    }

    /// Whether this placement was committed with violations.
    pub fn is_adjusted(&self) -> bool {
        self.status == PlacementStatus::Adjusted
    }
}

/// Clash log entry for an `Adjusted` placement, with grid labels resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashLogEntry {
    pub class_section: String,
    pub subject: String,
    pub day: String,
    pub slot: String,
    pub violations: Vec<Violation>,
}

impl ClashLogEntry {
    /// Builds an entry from a placement.
    pub fn from_placement(placement: &Placement, grid: &WeekGrid) -> Self {
        Self {
            class_section: placement.class_section.clone(),
            subject: placement.subject.clone(),
            day: grid.day_name(placement.day).to_string(),
            slot: grid.span_label(placement.start_slot, placement.duration),
            violations: placement.violations.clone(),
        }
    }
}

/// A unit of required hours that no strategy could place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnscheduledUnit {
    pub requirement: usize,
    pub class_section: String,
    pub subject: String,
    /// Hours the unit was meant to cover.
    pub hours: u32,
    pub reason: String,
}

/// A complete (possibly partial) weekly timetable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// Placements in commit order.
    pub placements: Vec<Placement>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing placement list.
    pub fn from_placements(placements: Vec<Placement>) -> Self {
        Self { placements }
    }

    /// Appends a placement.
    pub fn add(&mut self, placement: Placement) {
        self.placements.push(placement);
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether there are no placements.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Whether no placement carries violations.
    pub fn is_clash_free(&self) -> bool {
        self.placements.iter().all(|p| !p.is_adjusted())
    }

    /// Placements for a class-section.
    pub fn for_class(&self, class_section: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.class_section == class_section)
            .collect()
    }

    /// Placements taught by a faculty member.
    pub fn for_faculty(&self, faculty: &str) -> Vec<&Placement> {
        self.placements
            .iter()
            .filter(|p| p.faculty == faculty)
            .collect()
    }

    /// Placements held in a room.
    pub fn for_room(&self, room: &str) -> Vec<&Placement> {
        self.placements.iter().filter(|p| p.room == room).collect()
    }

    /// Placements on a day.
    pub fn for_day(&self, day: usize) -> Vec<&Placement> {
        self.placements.iter().filter(|p| p.day == day).collect()
    }

    /// Placements that needed adjustment.
    pub fn adjusted(&self) -> Vec<&Placement> {
        self.placements.iter().filter(|p| p.is_adjusted()).collect()
    }

    /// Placements ordered by (day, start slot, class-section).
    pub fn sorted(&self) -> Vec<&Placement> {
        let mut sorted: Vec<&Placement> = self.placements.iter().collect();
        sorted.sort_by(|a, b| {
            (a.day, a.start_slot, &a.class_section).cmp(&(b.day, b.start_slot, &b.class_section))
        });
        sorted
    }

    /// Sum of durations.
    pub fn total_hours(&self) -> u32 {
        self.placements.iter().map(|p| p.duration).sum()
    }

    /// Scheduled hours per (class-section, subject, kind).
    pub fn coverage(&self) -> HashMap<(&str, &str, SessionKind), u32> {
        let mut hours = HashMap::new();
        for p in &self.placements {
            *hours
                .entry((p.class_section.as_str(), p.subject.as_str(), p.kind))
                .or_insert(0) += p.duration;
        }
        hours
    }

    /// Distinct class-sections, sorted.
    pub fn class_sections(&self) -> BTreeSet<&str> {
        self.placements.iter().map(|p| p.class_section.as_str()).collect()
    }

    /// Clash log derived from the adjusted placements, in commit order.
    pub fn clash_log(&self, grid: &WeekGrid) -> Vec<ClashLogEntry> {
        self.placements
            .iter()
            .filter(|p| p.is_adjusted())
            .map(|p| ClashLogEntry::from_placement(p, grid))
            .collect()
    }
}
