//! Short-term plasticity state of a synapse during a single run.
//!
//! The state is made of two variables:
//! - the availability, i.e., the fraction of release sites holding a releasable vesicle, which
//!   recovers exponentially toward 1 with the depression recovery time constant;
//! - the release probability of an available site, which decays exponentially toward its
//!   baseline with the facilitation time constant.
//!
//! Depletion acts multiplicatively (only available sites can release) and facilitation acts
//! additively on the release probability.
use serde::{Deserialize, Serialize};

use crate::params::SynapseParams;

/// Smallest release probability the state can hold.
pub const MIN_RELEASE_PROBABILITY: f64 = f64::MIN_POSITIVE;

/// The mutable state of a synapse, scoped to one run.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationState {
    /// The fraction of release sites able to release, in [0, 1].
    pub availability: f64,
    /// The release probability of an available site, in (0, 1].
    pub release_probability: f64,
}

impl SimulationState {
    /// The steady state of a rested synapse: all sites available and baseline release probability.
    pub fn rested(params: &SynapseParams) -> Self {
        SimulationState {
            availability: 1.0,
            release_probability: params.base_release_probability,
        }
    }

    /// Let the state evolve (without spikes) during `dt` seconds.
    pub fn relax(&mut self, dt: f64, params: &SynapseParams) {
        let recovery = decay_factor(dt, params.depression_recovery_tau);
        self.availability = clamp_availability(1.0 - (1.0 - self.availability) * recovery);

        let decay = decay_factor(dt, params.facilitation_tau);
        let base = params.base_release_probability;
        self.release_probability =
            clamp_probability(base + (self.release_probability - base) * decay);
    }

    /// Remove the given fraction of release sites from the available pool.
    pub fn deplete(&mut self, released_fraction: f64) {
        self.availability = clamp_availability(self.availability - released_fraction);
    }

    /// Increase the release probability after a spike.
    pub fn facilitate(&mut self, params: &SynapseParams) {
        self.release_probability =
            clamp_probability(self.release_probability + params.facilitation_amount);
    }
}

/// Returns the factor by which a deviation from steady state shrinks over `dt` seconds.
pub fn decay_factor(dt: f64, tau: f64) -> f64 {
    if dt <= 0.0 {
        return 1.0;
    }
    (-dt / tau).exp()
}

fn clamp_availability(availability: f64) -> f64 {
    if availability.is_nan() {
        log::trace!("Availability is NaN, reset to 0");
        return 0.0;
    }
    availability.clamp(0.0, 1.0)
}

fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        log::trace!("Release probability is NaN, reset to minimum");
        return MIN_RELEASE_PROBABILITY;
    }
    probability.clamp(MIN_RELEASE_PROBABILITY, 1.0)
}
