//! Engine configuration.
//!
//! Every knob the search strategies use, with defaults matching the
//! institution's standing rules (4 teaching hours per class per day,
//! 5 per faculty member, 100 random probes per session, and so on).
//! All sections deserialize with `#[serde(default)]`, so a JSON document
//! only needs to name what it overrides.
//!
//! # Example
//! ```
//! use u_timetable::config::TimetableConfig;
//!
//! let config = TimetableConfig::from_json_str(r#"{ "genetic": { "generations": 40 } }"#).unwrap();
//! assert_eq!(config.genetic.generations, 40);
//! assert_eq!(config.limits.class_hours, 4);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Daily hour caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyLimits {
    /// Maximum teaching hours per class-section per day.
    pub class_hours: u32,
    /// Maximum teaching hours per faculty member per day.
    pub faculty_hours: u32,
}

impl Default for DailyLimits {
    fn default() -> Self {
        Self {
            class_hours: 4,
            faculty_hours: 5,
        }
    }
}

/// Greedy slot search budgets and ordering weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreedyConfig {
    /// Random (day, slot) draws per unit before falling back.
    pub max_attempts: usize,
    /// Fallback sweeps per faculty option.
    pub fallback_attempts: usize,
    /// Priority weight per required weekly hour.
    pub hours_weight: u32,
    /// Priority bonus for lab sessions.
    pub lab_bonus: u32,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            max_attempts: 100,
            fallback_attempts: 50,
            hours_weight: 10,
            lab_bonus: 5,
        }
    }
}

impl GreedyConfig {
    /// Sets the random draw ceiling.
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the fallback sweep ceiling.
    pub fn with_fallback_attempts(mut self, attempts: usize) -> Self {
        self.fallback_attempts = attempts;
        self
    }
}

/// Genetic optimizer budgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticConfig {
    /// Generation budget.
    pub generations: usize,
    /// Individuals per generation.
    pub population_size: usize,
    /// Random placement probes per block when building an individual.
    pub max_attempts: usize,
    /// Share of the population carried over unchanged (rounded up).
    pub elite_fraction: f64,
    /// Lower bound on the elite count.
    pub min_elite: usize,
    /// Individuals sampled per tournament.
    pub tournament_size: usize,
    /// Per-individual chance of replacement by a fresh random individual.
    pub mutation_rate: f64,
    /// Generations without a new best before early stop is considered.
    pub patience: usize,
    /// Early stop also requires the best fitness to exceed this.
    pub fitness_threshold: i64,
    /// Evaluate fitness on the rayon pool.
    pub parallel: bool,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            generations: 150,
            population_size: 50,
            max_attempts: 100,
            elite_fraction: 0.1,
            min_elite: 2,
            tournament_size: 5,
            mutation_rate: 0.05,
            patience: 20,
            fitness_threshold: 500,
            parallel: true,
        }
    }
}

impl GeneticConfig {
    /// Sets the generation budget.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the mutation rate (clamped to [0, 1]).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the early-stop patience.
    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    /// Enables or disables parallel fitness evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Elite count for the configured population: ⌈size × fraction⌉,
    /// at least `min_elite`, at most the population.
    pub fn elite_count(&self) -> usize {
        // epsilon absorbs 30 × 0.1 = 3.0000000000000004
        let fraction = (self.population_size as f64 * self.elite_fraction - 1e-9).ceil() as usize;
        fraction.max(self.min_elite).min(self.population_size)
    }
}

/// Fitness weights. Fitness = `base` − Σ weight × count, floored at `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyWeights {
    pub base: i64,
    pub room_clash: i64,
    pub faculty_clash: i64,
    pub class_clash: i64,
    pub repeated_subject: i64,
    pub class_overload: i64,
    pub faculty_overload: i64,
    /// Per required hour left unscheduled.
    pub missing_hour: i64,
    pub floor: i64,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            base: 1000,
            room_clash: 100,
            faculty_clash: 75,
            class_clash: 80,
            repeated_subject: 50,
            class_overload: 40,
            faculty_overload: 30,
            missing_hour: 10,
            floor: 1,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    pub limits: DailyLimits,
    pub greedy: GreedyConfig,
    pub genetic: GeneticConfig,
    pub penalties: PenaltyWeights,
}

impl TimetableConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the daily caps.
    pub fn with_limits(mut self, limits: DailyLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the greedy section.
    pub fn with_greedy(mut self, greedy: GreedyConfig) -> Self {
        self.greedy = greedy;
        self
    }

    /// Sets the genetic section.
    pub fn with_genetic(mut self, genetic: GeneticConfig) -> Self {
        self.genetic = genetic;
        self
    }

    /// Rejects budgets the search loops cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(TimetableError::InvalidConfig(msg.to_string()));
        if self.greedy.max_attempts == 0 {
            return invalid("greedy.max_attempts must be positive");
        }
        if self.genetic.population_size == 0 {
            return invalid("genetic.population_size must be positive");
        }
        if self.genetic.max_attempts == 0 {
            return invalid("genetic.max_attempts must be positive");
        }
        if self.genetic.tournament_size == 0 {
            return invalid("genetic.tournament_size must be positive");
        }
        if !(0.0..=1.0).contains(&self.genetic.mutation_rate) {
            return invalid("genetic.mutation_rate must lie in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.genetic.elite_fraction) {
            return invalid("genetic.elite_fraction must lie in [0, 1]");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = TimetableConfig::default();
        assert_eq!(c.limits.class_hours, 4);
        assert_eq!(c.limits.faculty_hours, 5);
        assert_eq!(c.greedy.max_attempts, 100);
        assert_eq!(c.greedy.fallback_attempts, 50);
        assert_eq!(c.genetic.tournament_size, 5);
        assert_eq!(c.penalties.base, 1000);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_elite_count() {
        let g = GeneticConfig::default().with_population_size(50);
        assert_eq!(g.elite_count(), 5);
        let g = GeneticConfig::default().with_population_size(11);
        assert_eq!(g.elite_count(), 2);
        let g = GeneticConfig::default().with_population_size(25);
        assert_eq!(g.elite_count(), 3);
        let g = GeneticConfig::default().with_population_size(1);
        assert_eq!(g.elite_count(), 1);
    }

    #[test]
    fn test_partial_json() {
        let c = TimetableConfig::from_json_str(
            r#"{ "limits": { "class_hours": 6 }, "genetic": { "parallel": false } }"#,
        )
        .unwrap();
        assert_eq!(c.limits.class_hours, 6);
        assert_eq!(c.limits.faculty_hours, 5);
        assert!(!c.genetic.parallel);
        assert_eq!(c.genetic.population_size, 50);
    }

    #[test]
    fn test_json_roundtrip() {
        let c =
            TimetableConfig::default().with_genetic(GeneticConfig::default().with_generations(7));
        let json = serde_json::to_string(&c).unwrap();
        let back = TimetableConfig::from_json_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_invalid_config() {
        let err = TimetableConfig::from_json_str(r#"{ "genetic": { "population_size": 0 } }"#);
        assert!(matches!(err, Err(TimetableError::InvalidConfig(_))));

        let err = TimetableConfig::from_json_str(r#"{ "genetic": { "mutation_rate": 1.5 } }"#);
        assert!(matches!(err, Err(TimetableError::InvalidConfig(_))));

        let err = TimetableConfig::from_json_str("not json");
        assert!(matches!(err, Err(TimetableError::ConfigParse(_))));
    }

    #[test]
    fn test_builders() {
        let g = GeneticConfig::default()
            .with_mutation_rate(2.0)
            .with_patience(3)
            .with_parallel(false);
        assert!((g.mutation_rate - 1.0).abs() < 1e-10);
        assert_eq!(g.patience, 3);
        assert!(!g.parallel);

        let greedy = GreedyConfig::default().with_max_attempts(5).with_fallback_attempts(1);
        assert_eq!(greedy.max_attempts, 5);
        assert_eq!(greedy.fallback_attempts, 1);
    }
}
