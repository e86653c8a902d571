//! Input validation for timetabling problems.
//!
//! Checks structural integrity of requirements, rooms and the week grid
//! before scheduling. Detects:
//! - Duplicate room IDs
//! - Empty day or slot lists
//! - Unsorted or overlapping slots
//! - Requirements without faculty
//! - Requirements whose session kind has no room
//! - Class-sections needing more hours than the grid has cells
//!
//! Validation is advisory: both strategies tolerate invalid input and
//! report what they could not place.

use std::collections::{BTreeMap, HashSet};

use crate::models::{rooms_of_kind, CourseRequirement, Room, WeekGrid};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two rooms share the same ID.
    DuplicateId,
    /// The grid has no days or no slots.
    EmptyGrid,
    /// Slots are out of order, zero-length or overlapping.
    InvalidSlots,
    /// A requirement lists no faculty member.
    MissingFaculty,
    /// No room matches a requirement's session kind.
    MissingRoomKind,
    /// A class-section needs more hours than the grid can hold.
    ExceedsCapacity,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a timetabling problem.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    requirements: &[CourseRequirement],
    rooms: &[Room],
    grid: &WeekGrid,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut room_ids = HashSet::new();
    for r in rooms {
        if !room_ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", r.id),
            ));
        }
    }

    if grid.days.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "No working days",
        ));
    }
    if grid.slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            "No time slots",
        ));
    }
    for (i, slot) in grid.slots.iter().enumerate() {
        if slot.start_minute >= slot.end_minute {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSlots,
                format!("Slot {} ({}) has no duration", i, slot.label()),
            ));
        }
    }
    for (i, pair) in grid.slots.windows(2).enumerate() {
        if pair[0].end_minute > pair[1].start_minute {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSlots,
                format!(
                    "Slot {} ({}) overlaps or precedes slot {} ({})",
                    i + 1,
                    pair[1].label(),
                    i,
                    pair[0].label()
                ),
            ));
        }
    }

    let mut class_hours: BTreeMap<&str, u32> = BTreeMap::new();
    for req in requirements {
        if req.faculty.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingFaculty,
                format!("{} {} has no faculty", req.class_section, req.subject),
            ));
        }
        if req.weekly_hours > 0 && rooms_of_kind(rooms, req.kind).is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingRoomKind,
                format!(
                    "{} {} needs a {} room but none exists",
                    req.class_section, req.subject, req.kind
                ),
            ));
        }
        *class_hours.entry(req.class_section.as_str()).or_insert(0) += req.weekly_hours;
    }

    let cells = (grid.day_count() * grid.slot_count()) as u64;
    for (class, hours) in class_hours {
        if u64::from(hours) > cells {
            errors.push(ValidationError::new(
                ValidationErrorKind::ExceedsCapacity,
                format!("{class} needs {hours} hours but the grid has {cells} slots"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
