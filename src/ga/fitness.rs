//! Penalty-based fitness.
//!
//! Fitness = base − Σ weight × count, floored at a small positive value.
//! Occupancy clashes are counted per occupied slot; the subject-repeat and
//! daily-cap rules are counted per offending placement as the running
//! totals are accumulated in list order. Uncovered required hours are
//! charged per hour.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{DailyLimits, PenaltyWeights};
use crate::models::{CourseRequirement, Placement, SessionKind};

/// Per-rule violation counts of one timetable and the resulting fitness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessReport {
    pub room_clashes: u32,
    pub faculty_clashes: u32,
    pub class_clashes: u32,
    pub repeated_subjects: u32,
    pub class_overloads: u32,
    pub faculty_overloads: u32,
    pub missing_hours: u32,
    pub fitness: i64,
}

impl FitnessReport {
    /// Total rule violations, excluding missing hours.
    pub fn clash_count(&self) -> u32 {
        self.room_clashes
            + self.faculty_clashes
            + self.class_clashes
            + self.repeated_subjects
            + self.class_overloads
            + self.faculty_overloads
    }

    /// No clashes and nothing missing.
    pub fn is_perfect(&self) -> bool {
        self.clash_count() == 0 && self.missing_hours == 0
    }
}

type CoverageKey = (String, String, SessionKind);

/// Scores placement lists against a fixed set of requirements.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    limits: DailyLimits,
    weights: PenaltyWeights,
    /// Required hours per (class-section, subject, kind).
    required: BTreeMap<CoverageKey, u32>,
}

impl FitnessEvaluator {
    /// Creates an evaluator for the given requirements.
    pub fn new<'r>(
        requirements: impl IntoIterator<Item = &'r CourseRequirement>,
        limits: DailyLimits,
        weights: PenaltyWeights,
    ) -> Self {
        let mut required = BTreeMap::new();
        for req in requirements {
            *required
                .entry((req.class_section.clone(), req.subject.clone(), req.kind))
                .or_insert(0) += req.weekly_hours;
        }
        Self {
            limits,
            weights,
            required,
        }
    }

    /// Counts every penalized condition and computes fitness.
    pub fn report(&self, placements: &[Placement]) -> FitnessReport {
        let mut r = FitnessReport::default();
        let mut rooms = HashSet::new();
        let mut faculty = HashSet::new();
        let mut classes = HashSet::new();
        let mut subject_days: HashMap<(&str, &str, usize), u32> = HashMap::new();
        let mut class_hours: HashMap<(&str, usize), u32> = HashMap::new();
        let mut faculty_hours: HashMap<(&str, usize), u32> = HashMap::new();
        let mut covered: HashMap<(&str, &str, SessionKind), u32> = HashMap::new();

        for p in placements {
            for s in p.slots() {
                if !rooms.insert((p.day, s, p.room.as_str())) {
                    r.room_clashes += 1;
                }
                if !faculty.insert((p.day, s, p.faculty.as_str())) {
                    r.faculty_clashes += 1;
                }
                if !classes.insert((p.day, s, p.class_section.as_str())) {
                    r.class_clashes += 1;
                }
            }

            let held = subject_days
                .entry((p.class_section.as_str(), p.subject.as_str(), p.day))
                .or_insert(0);
            *held += 1;
            if *held > 1 {
                r.repeated_subjects += 1;
            }

            let hours = class_hours.entry((p.class_section.as_str(), p.day)).or_insert(0);
            *hours += p.duration;
            if *hours > self.limits.class_hours {
                r.class_overloads += 1;
            }

            let hours = faculty_hours.entry((p.faculty.as_str(), p.day)).or_insert(0);
            *hours += p.duration;
            if *hours > self.limits.faculty_hours {
                r.faculty_overloads += 1;
            }

            *covered
                .entry((p.class_section.as_str(), p.subject.as_str(), p.kind))
                .or_insert(0) += p.duration;
        }

        for ((class, subject, kind), &need) in &self.required {
            let have = covered
                .get(&(class.as_str(), subject.as_str(), *kind))
                .copied()
                .unwrap_or(0);
            r.missing_hours += need.saturating_sub(have);
        }

        let w = &self.weights;
        let penalty = w.room_clash * r.room_clashes as i64
            + w.faculty_clash * r.faculty_clashes as i64
            + w.class_clash * r.class_clashes as i64
            + w.repeated_subject * r.repeated_subjects as i64
            + w.class_overload * r.class_overloads as i64
            + w.faculty_overload * r.faculty_overloads as i64
            + w.missing_hour * r.missing_hours as i64;
        r.fitness = (w.base - penalty).max(w.floor);
        r
    }

    /// Fitness only.
    pub fn fitness(&self, placements: &[Placement]) -> i64 {
        self.report(placements).fitness
    }

    /// Total required hours.
    pub fn required_hours(&self) -> u32 {
        self.required.values().sum()
    }
}
