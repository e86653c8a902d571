//! Constraint tracker: the authoritative record of what is already placed.
//!
//! Occupancy is keyed by `(day, slot, resource)` for rooms, faculty and
//! class-sections, plus a `(class, subject, day)` set and daily hour
//! counters for classes and faculty. [`ConstraintTracker::evaluate`] is
//! read-only and reports every broken rule; [`ConstraintTracker::commit`]
//! records a candidate unconditionally.
//!
//! A tracker belongs to exactly one search run (or one GA individual) and
//! is discarded with it. There is no rollback: search discards whole
//! losing individuals instead.

use std::collections::{HashMap, HashSet};

use crate::config::DailyLimits;
use crate::models::{CourseRequirement, Placement, PlacementStatus, Violation, ViolationType};

/// A prospective session: everything needed to check or record it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub day: usize,
    pub start_slot: usize,
    pub duration: u32,
    pub room: &'a str,
    pub faculty: &'a str,
    pub class_section: &'a str,
    pub subject: &'a str,
}

impl<'a> Candidate<'a> {
    /// Candidate for a session of `requirement`.
    pub fn for_requirement(
        requirement: &'a CourseRequirement,
        day: usize,
        start_slot: usize,
        duration: u32,
        room: &'a str,
        faculty: &'a str,
    ) -> Self {
        Self {
            day,
            start_slot,
            duration,
            room,
            faculty,
            class_section: &requirement.class_section,
            subject: &requirement.subject,
        }
    }

    /// Slot indices this candidate would occupy.
    pub fn slots(&self) -> std::ops::Range<usize> {
        self.start_slot..self.start_slot + self.duration as usize
    }

    /// Turns the candidate into a placement; non-empty `violations`
    /// make it `Adjusted`.
    pub fn to_placement(
        &self,
        index: usize,
        requirement: &CourseRequirement,
        violations: Vec<Violation>,
    ) -> Placement {
        let status = if violations.is_empty() {
            PlacementStatus::Scheduled
        } else {
            PlacementStatus::Adjusted
        };
        Placement {
            requirement: index,
            class_section: self.class_section.to_string(),
            subject: self.subject.to_string(),
            subject_code: requirement.subject_code.clone(),
            kind: requirement.kind,
            faculty: self.faculty.to_string(),
            room: self.room.to_string(),
            day: self.day,
            start_slot: self.start_slot,
            duration: self.duration,
            status,
            violations,
        }
    }
}

impl<'a> From<&'a Placement> for Candidate<'a> {
    fn from(p: &'a Placement) -> Self {
        Self {
            day: p.day,
            start_slot: p.start_slot,
            duration: p.duration,
            room: &p.room,
            faculty: &p.faculty,
            class_section: &p.class_section,
            subject: &p.subject,
        }
    }
}

type SlotKey = (usize, usize, String);

/// Occupancy and daily-load bookkeeping for one run.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTracker {
    limits: DailyLimits,
    /// (day, slot, room) → occupying class-section.
    room_slots: HashMap<SlotKey, String>,
    /// (day, slot, faculty) → class-section being taught.
    faculty_slots: HashMap<SlotKey, String>,
    /// (day, slot, class-section) → room.
    class_slots: HashMap<SlotKey, String>,
    /// (class-section, subject, day) already holding a session.
    subject_days: HashSet<(String, String, usize)>,
    class_day_hours: HashMap<(String, usize), u32>,
    faculty_day_hours: HashMap<(String, usize), u32>,
    faculty_workload: HashMap<String, u32>,
    room_usage: HashMap<String, Vec<(usize, usize)>>,
}

fn key(day: usize, slot: usize, id: &str) -> SlotKey {
    (day, slot, id.to_string())
}

impl ConstraintTracker {
    /// Creates an empty tracker enforcing the given daily caps.
    pub fn new(limits: DailyLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    /// Daily caps in force.
    pub fn limits(&self) -> DailyLimits {
        self.limits
    }

    /// Lists every rule the candidate would break, one entry per rule.
    ///
    /// Checked in order: room, faculty and class occupancy over every slot
    /// of the block, subject already held that day, class daily cap,
    /// faculty daily cap.
    pub fn evaluate(&self, c: &Candidate<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Some(occupant) = c
            .slots()
            .find_map(|s| self.room_slots.get(&key(c.day, s, c.room)))
        {
            violations.push(Violation::new(
                ViolationType::RoomOccupied,
                c.room,
                format!("Room {} already occupied by {}", c.room, occupant),
            ));
        }

        if let Some(teaching) = c
            .slots()
            .find_map(|s| self.faculty_slots.get(&key(c.day, s, c.faculty)))
        {
            violations.push(Violation::new(
                ViolationType::FacultyBusy,
                c.faculty,
                format!("Faculty {} already teaching {}", c.faculty, teaching),
            ));
        }

        if let Some(room) = c
            .slots()
            .find_map(|s| self.class_slots.get(&key(c.day, s, c.class_section)))
        {
            violations.push(Violation::new(
                ViolationType::ClassBusy,
                c.class_section,
                format!("Class {} already has class in {}", c.class_section, room),
            ));
        }

        if self.has_subject_on(c.class_section, c.subject, c.day) {
            violations.push(Violation::new(
                ViolationType::SubjectRepeated,
                c.class_section,
                format!(
                    "Subject {} already scheduled for {} that day",
                    c.subject, c.class_section
                ),
            ));
        }

        if self.class_hours_on(c.class_section, c.day) + c.duration > self.limits.class_hours {
            violations.push(Violation::new(
                ViolationType::ClassDailyLimit,
                c.class_section,
                format!(
                    "Class {} would exceed {} hours that day",
                    c.class_section, self.limits.class_hours
                ),
            ));
        }

        if self.faculty_hours_on(c.faculty, c.day) + c.duration > self.limits.faculty_hours {
            violations.push(Violation::new(
                ViolationType::FacultyDailyLimit,
                c.faculty,
                format!(
                    "Faculty {} would exceed {} hours that day",
                    c.faculty, self.limits.faculty_hours
                ),
            ));
        }

        violations
    }

    /// Whether the candidate breaks no rule.
    pub fn is_clean(&self, c: &Candidate<'_>) -> bool {
        self.evaluate(c).is_empty()
    }

    /// Records the candidate in every map and counter.
    ///
    /// Callers commit clean candidates, except where a strategy
    /// deliberately accepts an `Adjusted` placement; in that case later
    /// occupants overwrite earlier ones in the slot maps while counters
    /// keep accumulating.
    pub fn commit(&mut self, c: &Candidate<'_>) {
        for s in c.slots() {
            self.room_slots
                .insert(key(c.day, s, c.room), c.class_section.to_string());
            self.faculty_slots
                .insert(key(c.day, s, c.faculty), c.class_section.to_string());
            self.class_slots
                .insert(key(c.day, s, c.class_section), c.room.to_string());
            self.room_usage
                .entry(c.room.to_string())
                .or_default()
                .push((c.day, s));
        }
        self.subject_days.insert((
            c.class_section.to_string(),
            c.subject.to_string(),
            c.day,
        ));
        *self
            .class_day_hours
            .entry((c.class_section.to_string(), c.day))
            .or_insert(0) += c.duration;
        *self
            .faculty_day_hours
            .entry((c.faculty.to_string(), c.day))
            .or_insert(0) += c.duration;
        *self
            .faculty_workload
            .entry(c.faculty.to_string())
            .or_insert(0) += c.duration;
    }

    /// Whether the room is taken at `(day, slot)`.
    pub fn room_busy(&self, day: usize, slot: usize, room: &str) -> bool {
        self.room_slots.contains_key(&key(day, slot, room))
    }

    /// Whether the faculty member teaches at `(day, slot)`.
    pub fn faculty_busy(&self, day: usize, slot: usize, faculty: &str) -> bool {
        self.faculty_slots.contains_key(&key(day, slot, faculty))
    }

    /// Whether the class-section sits at `(day, slot)`.
    pub fn class_busy(&self, day: usize, slot: usize, class_section: &str) -> bool {
        self.class_slots.contains_key(&key(day, slot, class_section))
    }

    /// Whether the class-section already has this subject on `day`.
    pub fn has_subject_on(&self, class_section: &str, subject: &str, day: usize) -> bool {
        self.subject_days
            .contains(&(class_section.to_string(), subject.to_string(), day))
    }

    /// Committed hours for a class-section on a day.
    pub fn class_hours_on(&self, class_section: &str, day: usize) -> u32 {
        self.class_day_hours
            .get(&(class_section.to_string(), day))
            .copied()
            .unwrap_or(0)
    }

    /// Committed hours for a faculty member on a day.
    pub fn faculty_hours_on(&self, faculty: &str, day: usize) -> u32 {
        self.faculty_day_hours
            .get(&(faculty.to_string(), day))
            .copied()
            .unwrap_or(0)
    }

    /// Total committed hours per faculty member.
    pub fn faculty_workload(&self) -> &HashMap<String, u32> {
        &self.faculty_workload
    }

    /// Occupied `(day, slot)` cells of a room, in commit order.
    pub fn room_usage(&self, room: &str) -> &[(usize, usize)] {
        self.room_usage.get(room).map(Vec::as_slice).unwrap_or(&[])
    }
}
