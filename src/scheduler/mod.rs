//! Scheduling strategies behind one [`Scheduler`] capability.
//!
//! Two interchangeable strategies share the [`ConstraintTracker`] contract:
//!
//! - [`GreedyScheduler`]: single randomized pass with bounded retries and a
//!   least-clash fallback. Fast; used for on-demand per-class or
//!   per-faculty timetables.
//! - [`GeneticScheduler`](crate::ga::GeneticScheduler): population-based
//!   search over complete timetables, for batch runs.
//!
//! Everything a run depends on (scope, seed, budgets) is passed in
//! explicitly through [`ScheduleRequest`] and the strategy's config; the
//! clash log comes back in the [`ScheduleOutcome`].
//!
//! [`ConstraintTracker`]: crate::tracker::ConstraintTracker

mod greedy;

pub use greedy::{session_priority, GreedyScheduler};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::TimetableConfig;
use crate::ga::{FitnessReport, GaReport, GeneticScheduler};
use crate::models::{ClashLogEntry, CourseRequirement, Room, Timetable, UnscheduledUnit, WeekGrid};

/// Which requirements a run covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Every requirement.
    #[default]
    All,
    /// Requirements of one class-section.
    ClassSection(String),
    /// Requirements listing one faculty member.
    Faculty(String),
}

impl Scope {
    /// Whether the requirement falls within this scope.
    pub fn includes(&self, requirement: &CourseRequirement) -> bool {
        match self {
            Scope::All => true,
            Scope::ClassSection(class) => requirement.class_section == *class,
            Scope::Faculty(faculty) => requirement.is_taught_by(faculty),
        }
    }
}

/// Input container for one scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Weekly obligations.
    pub requirements: Vec<CourseRequirement>,
    /// Available rooms.
    pub rooms: Vec<Room>,
    /// Days × slots horizon.
    pub grid: WeekGrid,
    /// Requirement filter.
    pub scope: Scope,
    /// RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl ScheduleRequest {
    /// Creates a request over the standard week with no filter.
    pub fn new(requirements: Vec<CourseRequirement>, rooms: Vec<Room>) -> Self {
        Self {
            requirements,
            rooms,
            grid: WeekGrid::standard(),
            scope: Scope::All,
            seed: None,
        }
    }

    /// Sets the horizon.
    pub fn with_grid(mut self, grid: WeekGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether every input collection is non-empty.
    pub fn is_schedulable(&self) -> bool {
        !self.requirements.is_empty() && !self.rooms.is_empty() && !self.grid.is_empty()
    }

    /// Indices of in-scope requirements with positive hours, in input order.
    pub fn active_requirements(&self) -> Vec<usize> {
        self.requirements
            .iter()
            .enumerate()
            .filter(|(_, r)| r.weekly_hours > 0 && self.scope.includes(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// RNG for this run.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }
}

/// Result of a scheduling run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    /// Placements in commit order.
    pub timetable: Timetable,
    /// One entry per `Adjusted` placement.
    pub clash_log: Vec<ClashLogEntry>,
    /// Units that could not be placed at all.
    pub warnings: Vec<UnscheduledUnit>,
    /// Fitness of the returned timetable (genetic runs only).
    pub fitness: Option<FitnessReport>,
    /// Evolution summary (genetic runs only).
    pub report: Option<GaReport>,
}

impl ScheduleOutcome {
    /// Empty result, returned for empty inputs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every required hour was placed without clashes.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty() && self.clash_log.is_empty()
    }
}

/// A timetabling strategy.
pub trait Scheduler {
    /// Strategy name.
    fn name(&self) -> &'static str;

    /// Runs the strategy with the caller's RNG.
    fn schedule_with_rng<R: Rng>(&self, request: &ScheduleRequest, rng: &mut R) -> ScheduleOutcome;

    /// Runs the strategy with an RNG seeded from the request.
    fn schedule(&self, request: &ScheduleRequest) -> ScheduleOutcome {
        let mut rng = request.rng();
        self.schedule_with_rng(request, &mut rng)
    }
}

/// Strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Greedy,
    Genetic,
}

/// Either strategy, configured and ready to run.
#[derive(Debug, Clone)]
pub enum SearchStrategy {
    Greedy(GreedyScheduler),
    Genetic(GeneticScheduler),
}

impl SearchStrategy {
    /// Builds the selected strategy from a configuration.
    pub fn from_config(kind: StrategyKind, config: &TimetableConfig) -> Self {
        match kind {
            StrategyKind::Greedy => SearchStrategy::Greedy(
                GreedyScheduler::new()
                    .with_config(config.greedy.clone())
                    .with_limits(config.limits),
            ),
            StrategyKind::Genetic => SearchStrategy::Genetic(
                GeneticScheduler::new()
                    .with_config(config.genetic.clone())
                    .with_limits(config.limits)
                    .with_penalties(config.penalties.clone()),
            ),
        }
    }

    /// Which strategy this is.
    pub fn kind(&self) -> StrategyKind {
        match self {
            SearchStrategy::Greedy(_) => StrategyKind::Greedy,
            SearchStrategy::Genetic(_) => StrategyKind::Genetic,
        }
    }
}

impl Scheduler for SearchStrategy {
    fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Greedy(s) => s.name(),
            SearchStrategy::Genetic(s) => s.name(),
        }
    }

    fn schedule_with_rng<R: Rng>(&self, request: &ScheduleRequest, rng: &mut R) -> ScheduleOutcome {
        match self {
            SearchStrategy::Greedy(s) => s.schedule_with_rng(request, rng),
            SearchStrategy::Genetic(s) => s.schedule_with_rng(request, rng),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::{HashMap, HashSet};

    use crate::config::DailyLimits;
    use crate::models::{CourseRequirement, PlacementStatus, Room, SessionKind, Timetable, WeekGrid};

    /// Checks the occupancy and cap invariants over `Scheduled` placements,
    /// and that every `Adjusted` placement lists at least one violation.
    pub(crate) fn assert_invariants(timetable: &Timetable, limits: DailyLimits) {
        let mut rooms = HashSet::new();
        let mut faculty = HashSet::new();
        let mut classes = HashSet::new();
        let mut subjects = HashSet::new();
        let mut class_hours: HashMap<(&str, usize), u32> = HashMap::new();
        let mut faculty_hours: HashMap<(&str, usize), u32> = HashMap::new();

        for p in &timetable.placements {
            match p.status {
                PlacementStatus::Adjusted => {
                    assert!(!p.violations.is_empty(), "adjusted without violations: {p:?}");
                    continue;
                }
                PlacementStatus::Scheduled => assert!(p.violations.is_empty()),
            }
            for s in p.slots() {
                assert!(rooms.insert((p.day, s, p.room.as_str())), "room clash {p:?}");
                assert!(faculty.insert((p.day, s, p.faculty.as_str())), "faculty clash {p:?}");
                assert!(classes.insert((p.day, s, p.class_section.as_str())), "class clash {p:?}");
            }
            assert!(
                subjects.insert((p.class_section.as_str(), p.subject.as_str(), p.day)),
                "subject repeated {p:?}"
            );
            *class_hours.entry((p.class_section.as_str(), p.day)).or_insert(0) += p.duration;
            *faculty_hours.entry((p.faculty.as_str(), p.day)).or_insert(0) += p.duration;
        }
        assert!(class_hours.values().all(|&h| h <= limits.class_hours));
        assert!(faculty_hours.values().all(|&h| h <= limits.faculty_hours));
    }

    /// A small department: three class-sections, shared faculty, labs.
    pub(crate) fn department() -> (Vec<CourseRequirement>, Vec<Room>) {
        let mut reqs = Vec::new();
        for class in ["CS-5A", "CS-5B", "CS-3A"] {
            reqs.push(
                CourseRequirement::new(class, "Math")
                    .with_code("MA201")
                    .with_faculty("Dr.Khan")
                    .with_hours(3),
            );
            reqs.push(
                CourseRequirement::new(class, "Physics")
                    .with_code("PH101")
                    .with_faculty("Dr.Ali")
                    .with_faculty("Dr.Sara")
                    .with_hours(2),
            );
            reqs.push(
                CourseRequirement::new(class, "Programming Lab")
                    .with_code("CS110L")
                    .with_faculty("Dr.Noor")
                    .with_kind(SessionKind::Lab)
                    .with_hours(2),
            );
        }
        let rooms = vec![
            Room::lecture("Room-101").with_capacity(40),
            Room::lecture("Room-102").with_capacity(40),
            Room::lab("Lab-301").with_capacity(30),
        ];
        (reqs, rooms)
    }

    pub(crate) fn one_day(slots: u32) -> WeekGrid {
        WeekGrid::new(
            vec!["Monday".into()],
            (0..slots).map(|h| crate::models::TimeSlot::hour(8 + h)).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionKind;

    #[test]
    fn test_scope_filter() {
        let math = CourseRequirement::new("CS-5A", "Math")
            .with_faculty("Dr.Khan")
            .with_faculty("Dr.Ali")
            .with_hours(2);
        assert!(Scope::All.includes(&math));
        assert!(Scope::ClassSection("CS-5A".into()).includes(&math));
        assert!(!Scope::ClassSection("CS-5B".into()).includes(&math));
        assert!(Scope::Faculty("Dr.Ali".into()).includes(&math));
        assert!(!Scope::Faculty("Dr.Noor".into()).includes(&math));
    }

    #[test]
    fn test_active_requirements_skip_zero_hours() {
        let reqs = vec![
            CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(2),
            CourseRequirement::new("CS-5A", "Seminar").with_faculty("Dr.Khan"),
            CourseRequirement::new("CS-5B", "Math").with_faculty("Dr.Khan").with_hours(1),
        ];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]);
        assert_eq!(request.active_requirements(), vec![0, 2]);

        let scoped = request.with_scope(Scope::ClassSection("CS-5B".into()));
        assert_eq!(scoped.active_requirements(), vec![2]);
    }

    #[test]
    fn test_is_schedulable() {
        let reqs = vec![CourseRequirement::new("CS-5A", "Math")
            .with_faculty("Dr.Khan")
            .with_hours(2)];
        assert!(ScheduleRequest::new(reqs.clone(), vec![Room::lecture("R1")]).is_schedulable());
        assert!(!ScheduleRequest::new(reqs.clone(), vec![]).is_schedulable());
        assert!(!ScheduleRequest::new(vec![], vec![Room::lecture("R1")]).is_schedulable());
        let no_slots = WeekGrid::new(vec!["Monday".into()], vec![]);
        assert!(!ScheduleRequest::new(reqs, vec![Room::lecture("R1")])
            .with_grid(no_slots)
            .is_schedulable());
    }

    #[test]
    fn test_strategy_from_config() {
        let config = TimetableConfig::default();
        let greedy = SearchStrategy::from_config(StrategyKind::Greedy, &config);
        let genetic = SearchStrategy::from_config(StrategyKind::Genetic, &config);
        assert_eq!(greedy.kind(), StrategyKind::Greedy);
        assert_eq!(genetic.kind(), StrategyKind::Genetic);
        assert_eq!(greedy.name(), "greedy");
        assert_eq!(genetic.name(), "genetic");
    }

    #[test]
    fn test_both_strategies_place_single_requirement() {
        let reqs = vec![CourseRequirement::new("CS-5A", "Math")
            .with_faculty("Dr.Khan")
            .with_kind(SessionKind::Lecture)
            .with_hours(2)];
        let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]).with_seed(7);
        let mut config = TimetableConfig::default();
        config.genetic = config.genetic.with_generations(5).with_population_size(6);

        for kind in [StrategyKind::Greedy, StrategyKind::Genetic] {
            let outcome = SearchStrategy::from_config(kind, &config).schedule(&request);
            assert_eq!(outcome.timetable.total_hours(), 2, "{kind:?}");
            assert!(outcome.is_complete(), "{kind:?}");
        }
    }
}
