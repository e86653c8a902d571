//! Generational loop.
//!
//! # Algorithm
//!
//! 1. Build `population_size` random individuals.
//! 2. Each generation: score everyone (on the rayon pool when enabled),
//!    keep the best-ever individual, and stop early once `patience`
//!    generations pass without a new best while the best exceeds the
//!    fitness threshold.
//! 3. Next generation: the top ⌈10%⌉ (at least two) survive unchanged; the
//!    rest are tournament winners (5 sampled without replacement). Each
//!    non-elite is replaced by a fresh random individual with probability
//!    `mutation_rate`.
//! 4. Repair the best-ever individual and keep the repair only if it does
//!    not lower fitness.
//!
//! Scoring never touches the RNG, so parallel and sequential evaluation
//! produce identical runs for a given seed.

use std::cmp::Reverse;

use rand::seq::index;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::fitness::FitnessEvaluator;
use super::individual::{Individual, IndividualBuilder};
use super::repair::Repairer;
use crate::config::{DailyLimits, GeneticConfig, PenaltyWeights};
use crate::scheduler::{ScheduleOutcome, ScheduleRequest, Scheduler};

/// Why evolution stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Ran every configured generation.
    GenerationBudget,
    /// No new best for `patience` generations with fitness above threshold.
    Converged,
}

/// Summary of an evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaReport {
    pub generations_run: usize,
    pub stop_reason: StopReason,
    /// Best fitness observed before repair.
    pub best_fitness: i64,
    /// Best-so-far fitness after each generation.
    pub history: Vec<i64>,
    /// Whether the returned timetable is the repaired one.
    pub repaired: bool,
}

/// Genetic timetable optimizer.
///
/// # Example
///
/// ```
/// use u_timetable::config::GeneticConfig;
/// use u_timetable::ga::GeneticScheduler;
/// use u_timetable::models::{CourseRequirement, Room};
/// use u_timetable::scheduler::{ScheduleRequest, Scheduler};
///
/// let reqs = vec![
///     CourseRequirement::new("CS-5A", "Math").with_faculty("Dr.Khan").with_hours(2),
/// ];
/// let request = ScheduleRequest::new(reqs, vec![Room::lecture("R1")]).with_seed(1);
/// let ga = GeneticScheduler::new()
///     .with_config(GeneticConfig::default().with_generations(5).with_population_size(8));
///
/// let outcome = ga.schedule(&request);
/// assert_eq!(outcome.fitness.map(|f| f.fitness), Some(1000));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneticScheduler {
    config: GeneticConfig,
    limits: DailyLimits,
    penalties: PenaltyWeights,
}

impl GeneticScheduler {
    /// Creates an optimizer with default budgets, caps and weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets evolution budgets.
    pub fn with_config(mut self, config: GeneticConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets daily caps.
    pub fn with_limits(mut self, limits: DailyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets fitness weights.
    pub fn with_penalties(mut self, penalties: PenaltyWeights) -> Self {
        self.penalties = penalties;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    /// Runs the generational loop and returns the best-ever individual,
    /// its fitness and the run summary (before repair).
    pub fn evolve<R: Rng>(
        &self,
        builder: &IndividualBuilder<'_>,
        evaluator: &FitnessEvaluator,
        rng: &mut R,
    ) -> (Individual, i64, GaReport) {
        let size = self.config.population_size.max(1);
        let elite = self.config.elite_count().min(size);
        let mut population: Vec<Individual> = (0..size).map(|_| builder.build(rng)).collect();

        let mut best: Option<(Individual, i64)> = None;
        let mut history = Vec::new();
        let mut stale = 0usize;
        let mut stop_reason = StopReason::GenerationBudget;

        for generation in 0..self.config.generations {
            let scores = self.score(evaluator, &population);
            let mut improved = false;
            for (individual, &fitness) in population.iter().zip(&scores) {
                if best.as_ref().map_or(true, |(_, b)| fitness > *b) {
                    best = Some((individual.clone(), fitness));
                    improved = true;
                }
            }
            let best_fitness = best.as_ref().map_or(i64::MIN, |(_, f)| *f);
            history.push(best_fitness);
            stale = if improved { 0 } else { stale + 1 };
            debug!(generation, best = best_fitness, stale, "generation scored");

            if stale >= self.config.patience && best_fitness > self.config.fitness_threshold {
                stop_reason = StopReason::Converged;
                info!(generation, best = best_fitness, "converged");
                break;
            }

            population = self.next_generation(&population, &scores, elite, builder, rng);
        }

        let (individual, fitness) = match best {
            Some(found) => found,
            None => {
                let scores = self.score(evaluator, &population);
                let winner = fittest(&scores);
                (population.swap_remove(winner), scores[winner])
            }
        };

        let report = GaReport {
            generations_run: history.len(),
            stop_reason,
            best_fitness: fitness,
            history,
            repaired: false,
        };
        (individual, fitness, report)
    }

    fn score(&self, evaluator: &FitnessEvaluator, population: &[Individual]) -> Vec<i64> {
        if self.config.parallel {
            population
                .par_iter()
                .map(|ind| evaluator.fitness(&ind.placements))
                .collect()
        } else {
            population
                .iter()
                .map(|ind| evaluator.fitness(&ind.placements))
                .collect()
        }
    }

    fn next_generation<R: Rng>(
        &self,
        population: &[Individual],
        scores: &[i64],
        elite: usize,
        builder: &IndividualBuilder<'_>,
        rng: &mut R,
    ) -> Vec<Individual> {
        let mut ranked: Vec<usize> = (0..population.len()).collect();
        ranked.sort_by_key(|&i| Reverse(scores[i]));

        let mut next: Vec<Individual> = ranked
            .iter()
            .take(elite)
            .map(|&i| population[i].clone())
            .collect();
        while next.len() < population.len() {
            let winner = self.tournament(scores, rng);
            next.push(population[winner].clone());
        }

        for individual in next.iter_mut().skip(elite) {
            if rng.random::<f64>() < self.config.mutation_rate {
                *individual = builder.build(rng);
            }
        }
        next
    }

    /// Index of the fittest of a random sample; the first sampled wins ties.
    fn tournament<R: Rng>(&self, scores: &[i64], rng: &mut R) -> usize {
        let k = self.config.tournament_size.clamp(1, scores.len());
        let sample = index::sample(rng, scores.len(), k);
        let mut winner = sample.index(0);
        for i in sample.iter() {
            if scores[i] > scores[winner] {
                winner = i;
            }
        }
        winner
    }
}

/// Index of the highest score; the first wins ties.
fn fittest(scores: &[i64]) -> usize {
    let mut winner = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[winner] {
            winner = i;
        }
    }
    winner
}

impl Scheduler for GeneticScheduler {
    fn name(&self) -> &'static str {
        "genetic"
    }

    fn schedule_with_rng<R: Rng>(&self, request: &ScheduleRequest, rng: &mut R) -> ScheduleOutcome {
        if !request.is_schedulable() {
            debug!("empty requirements, rooms or grid; nothing to schedule");
            return ScheduleOutcome::empty();
        }

        let builder = IndividualBuilder::new(request, self.limits, self.config.max_attempts);
        let active = builder.active().to_vec();
        if active.is_empty() {
            return ScheduleOutcome::empty();
        }
        let evaluator = FitnessEvaluator::new(
            active.iter().map(|&i| &request.requirements[i]),
            self.limits,
            self.penalties.clone(),
        );

        let (best, best_fitness, mut report) = self.evolve(&builder, &evaluator, rng);

        let repaired = Repairer::new(request, &active, self.limits).repair(&best);
        let repaired_fitness = evaluator.report(&repaired.placements);
        let (chosen, fitness) = if repaired_fitness.fitness >= best_fitness {
            report.repaired = true;
            (repaired, repaired_fitness)
        } else {
            let fitness = evaluator.report(&best.placements);
            (best, fitness)
        };

        let warnings = chosen.unscheduled_units(request, &active);
        let timetable = chosen.into_timetable();
        let clash_log = timetable.clash_log(&request.grid);
        for unit in &warnings {
            warn!(
                class = %unit.class_section,
                subject = %unit.subject,
                hours = unit.hours,
                reason = %unit.reason,
                "unscheduled"
            );
        }
        for entry in &clash_log {
            warn!(
                class = %entry.class_section,
                subject = %entry.subject,
                day = %entry.day,
                slot = %entry.slot,
                clashes = entry.violations.len(),
                "placed with clashes"
            );
        }
        info!(
            generations = report.generations_run,
            fitness = fitness.fitness,
            adjusted = clash_log.len(),
            unscheduled = warnings.len(),
            "genetic run finished"
        );

        ScheduleOutcome {
            timetable,
            clash_log,
            warnings,
            fitness: Some(fitness),
            report: Some(report),
        }
    }
}
