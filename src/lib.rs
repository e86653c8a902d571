//! Weekly class timetabling engine for the U-Engine ecosystem.
//!
//! Assigns weekly class sessions (class-section × subject × faculty) to
//! (day, time-slot, room) so that no room, faculty member or class-section
//! is double-booked, while keeping each subject to one session per
//! class-section per day and respecting daily hour caps as closely as
//! possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `CourseRequirement`, `Room`, `WeekGrid`,
//!   `Placement`, `Timetable`
//! - **`blocks`**: Weekly hours → contiguous session lengths
//! - **`tracker`**: Occupancy and daily-load bookkeeping for one run
//! - **`scheduler`**: `Scheduler` trait, requests, outcomes, greedy search
//! - **`ga`**: Genetic optimizer with fitness and repair
//! - **`stats`**: Utilization and workload summaries
//! - **`validation`**: Input integrity checks
//! - **`config`**, **`error`**, **`logging`**: ambient plumbing
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{CourseRequirement, Room, SessionKind};
//! use u_timetable::scheduler::{ScheduleRequest, Scheduler, GreedyScheduler};
//!
//! let reqs = vec![
//!     CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(3),
//!     CourseRequirement::new("CS-5A", "Chem Lab")
//!         .with_faculty("Dr.Ali")
//!         .with_kind(SessionKind::Lab)
//!         .with_hours(2),
//! ];
//! let rooms = vec![Room::lecture("Room-101"), Room::lab("Lab-301")];
//! let request = ScheduleRequest::new(reqs, rooms).with_seed(42);
//!
//! let outcome = GreedyScheduler::new().schedule(&request);
//! assert_eq!(outcome.timetable.total_hours(), 5);
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod blocks;
pub mod config;
pub mod error;
pub mod ga;
pub mod logging;
pub mod models;
pub mod probe;
pub mod scheduler;
pub mod stats;
pub mod tracker;
pub mod validation;

pub use error::{Result, TimetableError};
