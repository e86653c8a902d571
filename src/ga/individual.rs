//! Random construction of complete timetables.
//!
//! Each requirement is split into blocks ([`decompose`]) and every block is
//! probed at random (day, contiguous start, faculty, room) until one fits
//! cleanly. A block that never fits degrades to a one-hour placement in the
//! first cell where the class-section and some listed faculty member are
//! both free; if that cell still breaks a rule the placement is `Adjusted`.

use std::collections::HashMap;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::blocks::decompose;
use crate::config::DailyLimits;
use crate::models::{
    rooms_of_kind, CourseRequirement, Placement, SessionKind, Timetable, UnscheduledUnit, Violation,
    WeekGrid,
};
use crate::probe::BoundedProbe;
use crate::scheduler::ScheduleRequest;
use crate::tracker::{Candidate, ConstraintTracker};

/// One candidate timetable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Individual {
    pub placements: Vec<Placement>,
}

impl Individual {
    pub fn new(placements: Vec<Placement>) -> Self {
        Self { placements }
    }

    /// Hours each active requirement still lacks, as `(index, hours)`.
    ///
    /// Scheduled hours of a (class-section, subject, kind) are credited to
    /// the requirements sharing that key in input order.
    pub fn shortfall(&self, request: &ScheduleRequest, active: &[usize]) -> Vec<(usize, u32)> {
        let mut pool: HashMap<(&str, &str, SessionKind), u32> = HashMap::new();
        for p in &self.placements {
            *pool
                .entry((p.class_section.as_str(), p.subject.as_str(), p.kind))
                .or_insert(0) += p.duration;
        }

        let mut missing = Vec::new();
        for &index in active {
            let req = &request.requirements[index];
            let have = pool
                .entry((req.class_section.as_str(), req.subject.as_str(), req.kind))
                .or_insert(0);
            let credited = (*have).min(req.weekly_hours);
            *have -= credited;
            if credited < req.weekly_hours {
                missing.push((index, req.weekly_hours - credited));
            }
        }
        missing
    }

    /// Shortfall expressed as warnings.
    pub fn unscheduled_units(
        &self,
        request: &ScheduleRequest,
        active: &[usize],
    ) -> Vec<UnscheduledUnit> {
        self.shortfall(request, active)
            .into_iter()
            .map(|(index, hours)| {
                let req = &request.requirements[index];
                UnscheduledUnit {
                    requirement: index,
                    class_section: req.class_section.clone(),
                    subject: req.subject.clone(),
                    hours,
                    reason: "no conflict-free slot found".to_string(),
                }
            })
            .collect()
    }

    pub fn into_timetable(self) -> Timetable {
        Timetable::from_placements(self.placements)
    }
}

/// Builds random individuals for one request.
#[derive(Debug, Clone)]
pub struct IndividualBuilder<'a> {
    request: &'a ScheduleRequest,
    active: Vec<usize>,
    limits: DailyLimits,
    probe: BoundedProbe,
}

impl<'a> IndividualBuilder<'a> {
    /// Creates a builder over the request's active requirements.
    pub fn new(request: &'a ScheduleRequest, limits: DailyLimits, max_attempts: usize) -> Self {
        Self {
            request,
            active: request.active_requirements(),
            limits,
            probe: BoundedProbe::new(max_attempts),
        }
    }

    /// Requirement indices this builder places, in placement order.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Builds one individual.
    pub fn build<R: Rng>(&self, rng: &mut R) -> Individual {
        let request = self.request;
        let grid = &request.grid;
        let mut tracker = ConstraintTracker::new(self.limits);
        let mut placements = Vec::new();

        for &index in &self.active {
            let req = &request.requirements[index];
            let rooms = rooms_of_kind(&request.rooms, req.kind);

            for duration in decompose(req.weekly_hours) {
                let starts = grid.block_starts(duration);
                let drawn = self.probe.run(
                    || {
                        let day = rng.random_range(0..grid.day_count());
                        let start = *starts.choose(rng)?;
                        let faculty = req.faculty.choose(rng)?;
                        let room = *rooms.choose(rng)?;
                        Some(Candidate::for_requirement(req, day, start, duration, room, faculty))
                    },
                    |c| tracker.is_clean(c),
                );

                let placed = match drawn.accepted {
                    Some(c) => Some((c, Vec::new())),
                    None => first_free_hour(req, &rooms, grid, &tracker, rng),
                };
                if let Some((c, violations)) = placed {
                    tracker.commit(&c);
                    placements.push(c.to_placement(index, req, violations));
                }
            }
        }

        Individual { placements }
    }
}

/// First (day, slot) where the class-section and a listed faculty member
/// are free, as a one-hour candidate in a random room of the right kind.
fn first_free_hour<'a, R: Rng>(
    req: &'a CourseRequirement,
    rooms: &[&'a str],
    grid: &WeekGrid,
    tracker: &ConstraintTracker,
    rng: &mut R,
) -> Option<(Candidate<'a>, Vec<Violation>)> {
    let room = *rooms.choose(rng)?;
    for day in 0..grid.day_count() {
        for slot in 0..grid.slot_count() {
            if tracker.class_busy(day, slot, &req.class_section) {
                continue;
            }
            let Some(faculty) = req
                .faculty
                .iter()
                .find(|f| !tracker.faculty_busy(day, slot, f))
            else {
                continue;
            };
            let candidate = Candidate::for_requirement(req, day, slot, 1, room, faculty);
            let violations = tracker.evaluate(&candidate);
            return Some((candidate, violations));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlacementStatus, Room};
    use crate::scheduler::test_support::{assert_invariants, department, one_day};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_blocks_follow_decomposition() {
        let reqs = vec![CourseRequirement::new("CS-5A", "Math")
            .with_faculty("Dr.Khan")
            .with_hours(7)];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]);
        let builder = IndividualBuilder::new(&request, DailyLimits::default(), 100);
        let mut rng = SmallRng::seed_from_u64(42);

        let ind = builder.build(&mut rng);
        let mut durations: Vec<u32> = ind.placements.iter().map(|p| p.duration).collect();
        durations.sort_unstable();
        assert_eq!(durations, vec![2, 2, 3]);
        assert!(ind.shortfall(&request, builder.active()).is_empty());
    }

    #[test]
    fn test_department_individual_invariants() {
        let (reqs, rooms) = department();
        let request = ScheduleRequest::new(reqs, rooms);
        let builder = IndividualBuilder::new(&request, DailyLimits::default(), 100);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..5 {
            let ind = builder.build(&mut rng);
            assert_invariants(&ind.clone().into_timetable(), DailyLimits::default());
            for p in &ind.placements {
                assert!(request.grid.is_contiguous(p.start_slot, p.duration));
            }
        }
    }

    #[test]
    fn test_fallback_to_single_hour() {
        // Only one slot per day: a 2-hour block can never fit.
        let reqs = vec![CourseRequirement::new("CS-5A", "Math")
            .with_faculty("Dr.Khan")
            .with_hours(2)];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]).with_grid(one_day(1));
        let builder = IndividualBuilder::new(&request, DailyLimits::default(), 20);
        let mut rng = SmallRng::seed_from_u64(1);

        let ind = builder.build(&mut rng);
        assert_eq!(ind.placements.len(), 1);
        assert_eq!(ind.placements[0].duration, 1);
        assert_eq!(ind.placements[0].status, PlacementStatus::Scheduled);
        assert_eq!(ind.shortfall(&request, builder.active()), vec![(0, 1)]);
        let units = ind.unscheduled_units(&request, builder.active());
        assert_eq!(units[0].hours, 1);
    }

    #[test]
    fn test_fallback_adjusted_on_room_clash() {
        let reqs = vec![
            CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(1),
            CourseRequirement::new("CS-5B", "Math").with_faculty("Dr.Ali").with_hours(1),
        ];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]).with_grid(one_day(1));
        let builder = IndividualBuilder::new(&request, DailyLimits::default(), 10);
        let mut rng = SmallRng::seed_from_u64(3);

        let ind = builder.build(&mut rng);
        assert_eq!(ind.placements.len(), 2);
        assert!(!ind.placements[0].is_adjusted());
        assert!(ind.placements[1].is_adjusted());
        assert_eq!(ind.placements[1].violations.len(), 1);
    }

    #[test]
    fn test_shortfall_shares_coverage_key() {
        let reqs = vec![
            CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(2),
            CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Ali").with_hours(1),
        ];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]);
        let ind = Individual::new(vec![crate::models::test_placement(
            "CS-5A", "Math", "Dr.Ali", "R1", 0, 0, 2,
        )]);
        assert_eq!(ind.shortfall(&request, &[0, 1]), vec![(1, 1)]);
    }
}
