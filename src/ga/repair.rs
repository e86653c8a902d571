//! Post-evolution repair of the best individual.
//!
//! Placements are replayed in order into a fresh tracker. Clean ones are
//! kept. A clashing placement is moved to the first clean (day, start,
//! faculty, room) with the same duration, scanning days and starts in grid
//! order; if none exists it is kept as `Adjusted` with its violations
//! recomputed. Finally each under-covered requirement is topped up with
//! clean one-hour sessions while any remain.
//!
//! Repair is deterministic and never consumes randomness.

use tracing::debug;

use super::individual::Individual;
use crate::config::DailyLimits;
use crate::models::{rooms_of_kind, PlacementStatus};
use crate::scheduler::ScheduleRequest;
use crate::tracker::{Candidate, ConstraintTracker};

/// Repairs individuals of one request.
#[derive(Debug, Clone)]
pub struct Repairer<'a> {
    request: &'a ScheduleRequest,
    active: &'a [usize],
    limits: DailyLimits,
}

impl<'a> Repairer<'a> {
    pub fn new(request: &'a ScheduleRequest, active: &'a [usize], limits: DailyLimits) -> Self {
        Self {
            request,
            active,
            limits,
        }
    }

    /// Returns the repaired copy of `individual`.
    pub fn repair(&self, individual: &Individual) -> Individual {
        let mut tracker = ConstraintTracker::new(self.limits);
        let mut repaired = Individual::default();
        let mut moved = 0usize;

        for p in &individual.placements {
            let current = Candidate::from(p);
            let violations = tracker.evaluate(&current);
            if violations.is_empty() {
                tracker.commit(&current);
                let mut kept = p.clone();
                kept.status = PlacementStatus::Scheduled;
                kept.violations.clear();
                repaired.placements.push(kept);
                continue;
            }

            if let Some(target) = self.relocate(p.requirement, p.duration, &tracker) {
                tracker.commit(&target);
                moved += 1;
                let req = &self.request.requirements[p.requirement];
                repaired
                    .placements
                    .push(target.to_placement(p.requirement, req, Vec::new()));
            } else {
                tracker.commit(&current);
                let mut kept = p.clone();
                kept.status = PlacementStatus::Adjusted;
                kept.violations = violations;
                repaired.placements.push(kept);
            }
        }

        let mut filled = 0u32;
        for (index, missing) in repaired.shortfall(self.request, self.active) {
            let req = &self.request.requirements[index];
            for _ in 0..missing {
                let Some(target) = self.relocate(index, 1, &tracker) else {
                    break;
                };
                tracker.commit(&target);
                filled += 1;
                repaired
                    .placements
                    .push(target.to_placement(index, req, Vec::new()));
            }
        }

        debug!(moved, filled, "repair pass finished");
        repaired
    }

    /// First clean slot for a session of `duration` hours of requirement `index`.
    fn relocate(
        &self,
        index: usize,
        duration: u32,
        tracker: &ConstraintTracker,
    ) -> Option<Candidate<'a>> {
        let request = self.request;
        let req = request.requirements.get(index)?;
        let rooms = rooms_of_kind(&request.rooms, req.kind);
        let starts = request.grid.block_starts(duration);

        for day in 0..request.grid.day_count() {
            for &start in &starts {
                for faculty in &req.faculty {
                    for &room in &rooms {
                        let c =
                            Candidate::for_requirement(req, day, start, duration, room, faculty);
                        if tracker.is_clean(&c) {
                            return Some(c);
                        }
                    }
                }
            }
        }
        None
    }
}
