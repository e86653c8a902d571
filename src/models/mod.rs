//! Timetabling domain models.
//!
//! Input records ([`CourseRequirement`], [`Room`], [`WeekGrid`]) are
//! immutable for a run. [`Placement`]s and the [`Timetable`] they form are
//! created by search and live only as long as the run's result.
//!
//! # Mapping
//!
//! | u-timetable | Meaning |
//! |-------------|---------|
//! | CourseRequirement | weekly hours of a subject owed to a class-section |
//! | Room | lecture room or lab |
//! | WeekGrid | working days × daily periods |
//! | Placement | one session on (day, slots, room, faculty) |

mod course;
mod grid;
mod placement;
mod room;

pub use course::{requirements_from_rows, CourseRequirement, CourseRow, SessionKind};
pub use grid::{TimeSlot, WeekGrid};
pub use placement::{
    ClashLogEntry, Placement, PlacementStatus, Timetable, UnscheduledUnit, Violation,
    ViolationType,
};
pub use room::{rooms_of_kind, Room, RoomRow};

#[cfg(test)]
pub(crate) use placement::tests::placement as test_placement;
