//! # Fault Injection Policy
//!
//! Simulated transient destination flakiness is a pluggable policy rather
//! than bare randomness, so the orchestrator's retry-pause branch can be
//! forced on or off deterministically in tests.

use rand::Rng;

/// Decides whether a per-site sync attempt experiences a simulated transient fault.
pub trait FaultPolicy: Send + Sync {
    fn should_inject(&self) -> bool;
}

/// Injects a fault with the configured probability.
#[derive(Debug, Clone)]
pub struct RandomFault {
    probability: f64,
}

impl RandomFault {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl FaultPolicy for RandomFault {
    fn should_inject(&self) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}

/// Never injects a fault; the deterministic default for tests.
#[derive(Debug, Clone, Copy)]
pub struct NeverFault;

impl FaultPolicy for NeverFault {
    fn should_inject(&self) -> bool {
        false
    }
}

/// Always injects a fault; forces the retry-pause branch in tests.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysFault;

impl FaultPolicy for AlwaysFault {
    fn should_inject(&self) -> bool {
        true
    }
}
