//! Bounded random probing.
//!
//! Both strategies repeatedly draw a candidate and test it until one is
//! accepted or the attempt ceiling is reached. The retry policy lives
//! here, separate from candidate generation, so tests can feed a fixed
//! candidate sequence instead of an RNG.

/// Retry policy with a fixed attempt ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedProbe {
    max_attempts: usize,
}

/// Result of a probe run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome<C> {
    /// The accepted candidate, if any.
    pub accepted: Option<C>,
    /// Generator calls made (including ones that produced nothing).
    pub attempts: usize,
}

impl BoundedProbe {
    /// Creates a probe allowing `max_attempts` draws.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Attempt ceiling.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draws candidates until `accept` returns true or the ceiling is hit.
    ///
    /// A draw that yields `None` still consumes an attempt.
    pub fn run<C, G, A>(&self, mut generate: G, mut accept: A) -> ProbeOutcome<C>
    where
        G: FnMut() -> Option<C>,
        A: FnMut(&C) -> bool,
    {
        for attempt in 1..=self.max_attempts {
            if let Some(candidate) = generate() {
                if accept(&candidate) {
                    return ProbeOutcome {
                        accepted: Some(candidate),
                        attempts: attempt,
                    };
                }
            }
        }
        ProbeOutcome {
            accepted: None,
            attempts: self.max_attempts,
        }
    }
}
