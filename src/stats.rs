//! Timetable statistics.
//!
//! Pure summaries of a finished timetable for display and export.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placements | Number of sessions |
//! | Distinct entities | Class-sections, faculty, rooms appearing at least once |
//! | Total hours | Sum of session durations |
//! | Duration histogram | Sessions per duration |
//! | Room usage | Sessions per room |
//! | Faculty hours | Scheduled hours per faculty member |
//! | Coverage ratio | Scheduled / required hours, capped per requirement |
//!
//! All maps are ordered so the same timetable always yields the same summary.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::models::{CourseRequirement, SessionKind, Timetable, WeekGrid};

/// Summary of a timetable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimetableStats {
    pub total_placements: usize,
    pub class_sections: usize,
    pub faculty: usize,
    pub rooms: usize,
    pub total_hours: u32,
    /// Duration (hours) → number of sessions.
    pub duration_histogram: BTreeMap<u32, usize>,
    /// Room → number of sessions.
    pub room_sessions: BTreeMap<String, usize>,
    /// Faculty → scheduled hours.
    pub faculty_hours: BTreeMap<String, u32>,
    /// Sessions committed with residual clashes.
    pub adjusted: usize,
}

impl TimetableStats {
    /// Computes the summary. An empty timetable yields the default summary.
    pub fn calculate(timetable: &Timetable) -> Self {
        let mut stats = Self::default();
        let mut classes = BTreeSet::new();
        let mut faculty = BTreeSet::new();

        for p in &timetable.placements {
            stats.total_placements += 1;
            stats.total_hours += p.duration;
            classes.insert(p.class_section.as_str());
            faculty.insert(p.faculty.as_str());
            *stats.duration_histogram.entry(p.duration).or_insert(0) += 1;
            *stats.room_sessions.entry(p.room.clone()).or_insert(0) += 1;
            *stats.faculty_hours.entry(p.faculty.clone()).or_insert(0) += p.duration;
            if p.is_adjusted() {
                stats.adjusted += 1;
            }
        }

        stats.class_sections = classes.len();
        stats.faculty = faculty.len();
        stats.rooms = stats.room_sessions.len();
        stats
    }

    /// Share of the grid's cells a room is occupied (0.0..=1.0 when clash-free).
    pub fn room_utilization(timetable: &Timetable, room: &str, grid: &WeekGrid) -> f64 {
        let cells = grid.day_count() * grid.slot_count();
        if cells == 0 {
            return 0.0;
        }
        let used: u32 = timetable.for_room(room).iter().map(|p| p.duration).sum();
        used as f64 / cells as f64
    }
}

/// Weekly hours demanded of each faculty member.
///
/// Co-taught requirements count in full for every listed faculty member,
/// since any of them may end up teaching every session.
pub fn required_workload(requirements: &[CourseRequirement]) -> BTreeMap<String, u32> {
    let mut workload = BTreeMap::new();
    for req in requirements {
        for f in &req.faculty {
            *workload.entry(f.clone()).or_insert(0) += req.weekly_hours;
        }
    }
    workload
}

/// Scheduled share of required hours, each requirement key credited at most
/// its requirement. `1.0` when nothing is required.
pub fn coverage_ratio(timetable: &Timetable, requirements: &[CourseRequirement]) -> f64 {
    let mut required: HashMap<(&str, &str, SessionKind), u32> = HashMap::new();
    for req in requirements {
        *required
            .entry((req.class_section.as_str(), req.subject.as_str(), req.kind))
            .or_insert(0) += req.weekly_hours;
    }
    let total: u32 = required.values().sum();
    if total == 0 {
        return 1.0;
    }

    let scheduled = timetable.coverage();
    let covered: u32 = required
        .iter()
        .map(|(key, &need)| scheduled.get(key).copied().unwrap_or(0).min(need))
        .sum();
    covered as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{test_placement as placement, PlacementStatus};

    fn sample() -> Timetable {
        let mut t = Timetable::new();
        t.add(placement("CS-5A", "Math", "Dr.Khan", "R1", 0, 0, 2));
        t.add(placement("CS-5A", "Physics", "Dr.Ali", "R2", 0, 2, 1));
        t.add(placement("CS-5B", "Math", "Dr.Khan", "R1", 1, 0, 2));
        t
    }

    #[test]
    fn test_stats_basic() {
        let s = TimetableStats::calculate(&sample());
        assert_eq!(s.total_placements, 3);
        assert_eq!(s.class_sections, 2);
        assert_eq!(s.faculty, 2);
        assert_eq!(s.rooms, 2);
        assert_eq!(s.total_hours, 5);
        assert_eq!(s.duration_histogram[&2], 2);
        assert_eq!(s.duration_histogram[&1], 1);
        assert_eq!(s.room_sessions["R1"], 2);
        assert_eq!(s.faculty_hours["Dr.Khan"], 4);
        assert_eq!(s.adjusted, 0);
    }

    #[test]
    fn test_stats_idempotent() {
        let t = sample();
        assert_eq!(TimetableStats::calculate(&t), TimetableStats::calculate(&t));
        let a = serde_json::to_string(&TimetableStats::calculate(&t)).unwrap();
        let b = serde_json::to_string(&TimetableStats::calculate(&t)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stats_empty() {
        let s = TimetableStats::calculate(&Timetable::new());
        assert_eq!(s, TimetableStats::default());
    }

    #[test]
    fn test_adjusted_counted() {
        let mut t = sample();
        let mut p = placement("CS-5C", "Math", "Dr.Khan", "R1", 0, 0, 1);
        p.status = PlacementStatus::Adjusted;
        t.add(p);
        assert_eq!(TimetableStats::calculate(&t).adjusted, 1);
    }

    #[test]
    fn test_room_utilization() {
        let grid = WeekGrid::standard();
        let u = TimetableStats::room_utilization(&sample(), "R1", &grid);
        assert!((u - 4.0 / 45.0).abs() < 1e-10);
        assert_eq!(TimetableStats::room_utilization(&sample(), "R9", &grid), 0.0);
    }

    #[test]
    fn test_required_workload() {
        let reqs = vec![
            CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(3),
            CourseRequirement::new("CS-5A", "Physics")
                .with_faculty("Dr.Ali")
                .with_faculty("Dr.Khan")
                .with_hours(2),
        ];
        let w = required_workload(&reqs);
        assert_eq!(w["Dr.Khan"], 5);
        assert_eq!(w["Dr.Ali"], 2);
    }

    #[test]
    fn test_coverage_ratio() {
        let reqs = vec![
            CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(2),
            CourseRequirement::new("CS-5A", "Physics").with_faculty("Dr.Ali").with_hours(2),
        ];
        assert!((coverage_ratio(&sample(), &reqs) - 0.75).abs() < 1e-10);
        assert_eq!(coverage_ratio(&Timetable::new(), &[]), 1.0);
    }
}
