//! Randomized greedy timetabling.
//!
//! # Algorithm
//!
//! 1. Order in-scope requirements by priority: weekly hours × 10, plus 5
//!    for labs (descending, stable on ties).
//! 2. Treat every required hour as a one-slot unit. Pick a faculty member
//!    at random and draw up to `max_attempts` random (day, slot, room)
//!    cells, committing the first clean one.
//! 3. Otherwise sweep the not-yet-tried cells of that (class-section,
//!    subject), once per faculty option, and commit the least-violating
//!    candidate as `Adjusted`.
//! 4. A unit with no candidate left becomes a warning; the pass goes on.
//!
//! # Complexity
//! O(h × (a + f × d × s)) where h = required hours, a = random attempts,
//! f = faculty options, d × s = grid cells.

use std::cmp::Reverse;
use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::{debug, info, warn};

use super::{ScheduleOutcome, ScheduleRequest, Scheduler};
use crate::config::{DailyLimits, GreedyConfig};
use crate::models::{
    rooms_of_kind, CourseRequirement, SessionKind, Timetable, UnscheduledUnit, Violation, WeekGrid,
};
use crate::probe::BoundedProbe;
use crate::tracker::{Candidate, ConstraintTracker};

/// (day, slot, class-section, subject) cells already examined.
type TriedCells<'a> = HashSet<(usize, usize, &'a str, &'a str)>;

/// Ordering priority of a requirement.
pub fn session_priority(requirement: &CourseRequirement, config: &GreedyConfig) -> u32 {
    let bonus = match requirement.kind {
        SessionKind::Lab => config.lab_bonus,
        SessionKind::Lecture => 0,
    };
    requirement
        .weekly_hours
        .saturating_mul(config.hours_weight)
        .saturating_add(bonus)
}

/// Single-pass greedy scheduler.
///
/// # Example
///
/// ```
/// use u_timetable::models::{CourseRequirement, Room};
/// use u_timetable::scheduler::{GreedyScheduler, ScheduleRequest, Scheduler};
///
/// let reqs = vec![
///     CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(2),
/// ];
/// let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]).with_seed(1);
///
/// let outcome = GreedyScheduler::new().schedule(&request);
/// assert_eq!(outcome.timetable.total_hours(), 2);
/// assert!(outcome.clash_log.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GreedyScheduler {
    config: GreedyConfig,
    limits: DailyLimits,
}

impl GreedyScheduler {
    /// Creates a scheduler with default budgets and caps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets search budgets and ordering weights.
    pub fn with_config(mut self, config: GreedyConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets daily caps.
    pub fn with_limits(mut self, limits: DailyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// In-scope requirement indices, highest priority first.
    pub fn order(&self, request: &ScheduleRequest) -> Vec<usize> {
        let mut order = request.active_requirements();
        order.sort_by_key(|&i| Reverse(session_priority(&request.requirements[i], &self.config)));
        order
    }

    /// Sweeps untried cells for the least-violating candidate.
    ///
    /// Returns as soon as a clean candidate turns up. Every examined cell
    /// is marked tried.
    fn least_clash<'a, R: Rng>(
        &self,
        requirement: &'a CourseRequirement,
        rooms: &[&'a str],
        grid: &WeekGrid,
        tracker: &ConstraintTracker,
        tried: &mut TriedCells<'a>,
        rng: &mut R,
    ) -> Option<(Candidate<'a>, Vec<Violation>)> {
        let mut days: Vec<usize> = (0..grid.day_count()).collect();
        let mut slots: Vec<usize> = (0..grid.slot_count()).collect();
        let mut best: Option<(Candidate<'a>, Vec<Violation>)> = None;

        for faculty in &requirement.faculty {
            for _ in 0..self.config.fallback_attempts {
                days.shuffle(rng);
                slots.shuffle(rng);
                for &day in &days {
                    for &slot in &slots {
                        let cell = (
                            day,
                            slot,
                            requirement.class_section.as_str(),
                            requirement.subject.as_str(),
                        );
                        if !tried.insert(cell) {
                            continue;
                        }
                        let room = *rooms.choose(rng)?;
                        let candidate =
                            Candidate::for_requirement(requirement, day, slot, 1, room, faculty);
                        let violations = tracker.evaluate(&candidate);
                        if violations.is_empty() {
                            return Some((candidate, violations));
                        }
                        if best
                            .as_ref()
                            .map_or(true, |(_, fewest)| violations.len() < fewest.len())
                        {
                            best = Some((candidate, violations));
                        }
                    }
                }
            }
        }
        best
    }
}

fn unscheduled(index: usize, requirement: &CourseRequirement, reason: &str) -> UnscheduledUnit {
    UnscheduledUnit {
        requirement: index,
        class_section: requirement.class_section.clone(),
        subject: requirement.subject.clone(),
        hours: 1,
        reason: reason.to_string(),
    }
}

impl Scheduler for GreedyScheduler {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn schedule_with_rng<R: Rng>(&self, request: &ScheduleRequest, rng: &mut R) -> ScheduleOutcome {
        if !request.is_schedulable() {
            debug!("empty requirements, rooms or grid; nothing to schedule");
            return ScheduleOutcome::empty();
        }

        let grid = &request.grid;
        let probe = BoundedProbe::new(self.config.max_attempts);
        let mut tracker = ConstraintTracker::new(self.limits);
        let mut tried = TriedCells::new();
        let mut timetable = Timetable::new();
        let mut warnings = Vec::new();

        for index in self.order(request) {
            let req = &request.requirements[index];
            let rooms = rooms_of_kind(&request.rooms, req.kind);

            for hour in 1..=req.weekly_hours {
                if rooms.is_empty() {
                    warn!(
                        class = %req.class_section,
                        subject = %req.subject,
                        kind = %req.kind,
                        "unscheduled: no room of this kind"
                    );
                    warnings.push(unscheduled(index, req, "no room of the required kind"));
                    continue;
                }
                let Some(faculty) = req.faculty.choose(rng) else {
                    warn!(
                        class = %req.class_section,
                        subject = %req.subject,
                        "unscheduled: no faculty listed"
                    );
                    warnings.push(unscheduled(index, req, "no faculty listed"));
                    continue;
                };

                let drawn = probe.run(
                    || {
                        let day = rng.random_range(0..grid.day_count());
                        let slot = rng.random_range(0..grid.slot_count());
                        let room = *rooms.choose(rng)?;
                        Some(Candidate::for_requirement(req, day, slot, 1, room, faculty))
                    },
                    |c| tracker.is_clean(c),
                );

                if let Some(c) = drawn.accepted {
                    tracker.commit(&c);
                    tried.insert((c.day, c.start_slot, c.class_section, c.subject));
                    debug!(
                        class = c.class_section,
                        subject = c.subject,
                        hour,
                        attempts = drawn.attempts,
                        "placed"
                    );
                    timetable.add(c.to_placement(index, req, Vec::new()));
                    continue;
                }

                match self.least_clash(req, &rooms, grid, &tracker, &mut tried, rng) {
                    Some((c, violations)) => {
                        tracker.commit(&c);
                        if !violations.is_empty() {
                            warn!(
                                class = c.class_section,
                                subject = c.subject,
                                day = grid.day_name(c.day),
                                slot = %grid.span_label(c.start_slot, 1),
                                clashes = violations.len(),
                                "placed with clashes"
                            );
                        }
                        timetable.add(c.to_placement(index, req, violations));
                    }
                    None => {
                        warn!(
                            class = %req.class_section,
                            subject = %req.subject,
                            hour,
                            "unscheduled: no untried slot left"
                        );
                        warnings.push(unscheduled(index, req, "no untried slot left"));
                    }
                }
            }
        }

        let clash_log = timetable.clash_log(grid);
        info!(
            placements = timetable.len(),
            adjusted = clash_log.len(),
            unscheduled = warnings.len(),
            "greedy pass finished"
        );

        ScheduleOutcome {
            timetable,
            clash_log,
            warnings,
            fitness: None,
            report: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlacementStatus, Room, ViolationType};
    use crate::scheduler::test_support::{assert_invariants, department, one_day};
    use crate::scheduler::Scope;
    use tracing_test::traced_test;

    fn math(class: &str, faculty: &str, hours: u32) -> CourseRequirement {
        CourseRequirement::new(class, "Math")
            .with_faculty(faculty)
            .with_hours(hours)
    }

    #[test]
    fn test_priority_order() {
        let reqs = vec![
            math("CS-5A", "Dr.Khan", 2),
            CourseRequirement::new("CS-5A", "Chem Lab")
                .with_faculty("Dr.Ali")
                .with_kind(SessionKind::Lab)
                .with_hours(2),
            math("CS-5B", "Dr.Khan", 3),
            math("CS-5C", "Dr.Khan", 2),
        ];
        let config = GreedyConfig::default();
        assert_eq!(session_priority(&reqs[0], &config), 20);
        assert_eq!(session_priority(&reqs[1], &config), 25);

        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]);
        // 30, 25, then the two 20s in input order
        assert_eq!(GreedyScheduler::new().order(&request), vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_priority_saturates_on_huge_hours() {
        let config = GreedyConfig::default();
        let lecture = math("CS-5A", "Dr.Khan", u32::MAX);
        let lab = CourseRequirement::new("CS-5A", "Chem Lab")
            .with_faculty("Dr.Ali")
            .with_kind(SessionKind::Lab)
            .with_hours(u32::MAX / 10);
        assert_eq!(session_priority(&lecture, &config), u32::MAX);
        assert_eq!(session_priority(&lab, &config), u32::MAX);

        let request = ScheduleRequest::new(
            vec![math("CS-5B", "Dr.Khan", 3), lecture],
            vec![Room::lecture("R1")],
        );
        assert_eq!(GreedyScheduler::new().order(&request), vec![1, 0]);
    }

    #[test]
    fn test_single_requirement_spreads_over_days() {
        let request =
            ScheduleRequest::new(vec![math("CS-5A", "Dr.Khan", 2)], vec![Room::lecture("R1")])
                .with_seed(3);
        let outcome = GreedyScheduler::new().schedule(&request);

        let placements = &outcome.timetable.placements;
        assert_eq!(placements.len(), 2);
        assert!(placements.iter().all(|p| p.duration == 1));
        assert!(placements.iter().all(|p| p.status == PlacementStatus::Scheduled));
        assert_ne!(placements[0].day, placements[1].day);
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_department_invariants() {
        let (reqs, rooms) = department();
        let required: u32 = reqs.iter().map(|r| r.weekly_hours).sum();
        for seed in 0..5 {
            let request = ScheduleRequest::new(reqs.clone(), rooms.clone()).with_seed(seed);
            let outcome = GreedyScheduler::new().schedule(&request);
            assert_invariants(&outcome.timetable, DailyLimits::default());

            let missing: u32 = outcome.warnings.iter().map(|w| w.hours).sum();
            assert_eq!(outcome.timetable.total_hours() + missing, required);
            assert_eq!(outcome.clash_log.len(), outcome.timetable.adjusted().len());
            for p in &outcome.timetable.placements {
                let kind = rooms.iter().find(|r| r.id == p.room).map(|r| r.kind);
                assert_eq!(kind, Some(p.kind));
            }
        }
    }

    #[test]
    fn test_scope_class_section() {
        let (reqs, rooms) = department();
        let request = ScheduleRequest::new(reqs, rooms)
            .with_scope(Scope::ClassSection("CS-5B".into()))
            .with_seed(11);
        let outcome = GreedyScheduler::new().schedule(&request);
        assert_eq!(outcome.timetable.total_hours(), 7);
        assert!(outcome.timetable.placements.iter().all(|p| p.class_section == "CS-5B"));
    }

    #[test]
    fn test_scope_faculty() {
        let (reqs, rooms) = department();
        let request = ScheduleRequest::new(reqs, rooms)
            .with_scope(Scope::Faculty("Dr.Sara".into()))
            .with_seed(5);
        let outcome = GreedyScheduler::new().schedule(&request);
        assert_eq!(outcome.timetable.total_hours(), 6);
        assert!(outcome.timetable.placements.iter().all(|p| p.subject == "Physics"));
    }

    #[test]
    fn test_shared_faculty_adjusted() {
        let reqs = vec![math("CS-5A", "Dr.Khan", 1), math("CS-5B", "Dr.Khan", 1)];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")])
            .with_grid(one_day(1))
            .with_seed(9);
        let outcome = GreedyScheduler::new().schedule(&request);

        assert_eq!(outcome.timetable.len(), 2);
        assert_eq!(outcome.timetable.placements[0].status, PlacementStatus::Scheduled);
        let adjusted = &outcome.timetable.placements[1];
        assert_eq!(adjusted.class_section, "CS-5B");
        assert_eq!(adjusted.status, PlacementStatus::Adjusted);
        let kinds: Vec<_> = adjusted.violations.iter().map(|v| v.violation_type).collect();
        assert_eq!(kinds, vec![ViolationType::RoomOccupied, ViolationType::FacultyBusy]);

        assert_eq!(outcome.clash_log.len(), 1);
        assert_eq!(outcome.clash_log[0].day, "Monday");
        assert_eq!(outcome.clash_log[0].slot, "08:00-09:00");
        assert!(outcome.warnings.is_empty());
    }

    #[traced_test]
    #[test]
    fn test_unscheduled_unit_warned() {
        let request =
            ScheduleRequest::new(vec![math("CS-5A", "Dr.Khan", 2)], vec![Room::lecture("R1")])
                .with_grid(one_day(1))
                .with_seed(1);
        let outcome = GreedyScheduler::new().schedule(&request);

        assert_eq!(outcome.timetable.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].hours, 1);
        assert_eq!(outcome.warnings[0].class_section, "CS-5A");
        assert!(logs_contain("unscheduled"));
    }

    #[test]
    fn test_missing_room_kind_warns_per_hour() {
        let lab = CourseRequirement::new("CS-5A", "Chem Lab")
            .with_faculty("Dr.Ali")
            .with_kind(SessionKind::Lab)
            .with_hours(2);
        let request = ScheduleRequest::new(vec![lab], vec![Room::lecture("R1")]).with_seed(0);
        let outcome = GreedyScheduler::new().schedule(&request);
        assert!(outcome.timetable.is_empty());
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let request = ScheduleRequest::new(vec![], vec![Room::lecture("R1")]);
        let outcome = GreedyScheduler::new().schedule(&request);
        assert!(outcome.timetable.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_seed_determinism() {
        let (reqs, rooms) = department();
        let request = ScheduleRequest::new(reqs, rooms).with_seed(42);
        let a = GreedyScheduler::new().schedule(&request);
        let b = GreedyScheduler::new().schedule(&request);
        assert_eq!(a.timetable, b.timetable);
    }
}
