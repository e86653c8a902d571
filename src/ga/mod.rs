//! Genetic timetable optimization.
//!
//! Individuals are complete timetables built by randomized block placement,
//! scored by a penalty-based fitness, and evolved by elitism, tournament
//! selection and coarse mutation (replacing an individual with a fresh
//! random one). There is no crossover: two timetables cannot be spliced
//! without re-validating every placement, so variation comes from fresh
//! construction alone.
//!
//! # Submodules
//!
//! - [`individual`]: random construction and coverage shortfall
//! - [`fitness`]: per-rule counts and the fitness value
//! - [`repair`]: deterministic clean-up of the best individual
//!
//! # Reference
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod fitness;
pub mod individual;
pub mod repair;
mod runner;

pub use fitness::{FitnessEvaluator, FitnessReport};
pub use individual::{Individual, IndividualBuilder};
pub use repair::Repairer;
pub use runner::{GaReport, GeneticScheduler, StopReason};
