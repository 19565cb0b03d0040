//! Release draws: how many sites release on a spike, and the resulting amplitude.
//!
//! Two implementations share the [`ReleaseDraw`] interface:
//! - [`ExpectedRelease`] propagates expectations deterministically;
//! - [`SampledRelease`] tracks an integer number of available sites and draws every quantity
//!   from an injected random source.
//!
//! In sampled mode, each depleted site refills independently with probability
//! `1 - exp(-dt / tau)` during an interval `dt`, and each available site releases independently
//! with the current release probability. Both draws are binomial and linear in the number of
//! sites, so the mean of the sampled state follows the expected recursion exactly.
use rand::Rng;
use rand_distr::{Binomial, Distribution, Gamma, Normal};

use crate::params::SynapseParams;
use crate::state::{decay_factor, SimulationState};

/// The outcome of a single spike.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Release {
    /// The number of releasing sites (an expectation in expected mode).
    pub sites: f64,
    /// The PSP amplitude produced by the spike.
    pub amplitude: f64,
}

/// A strategy to advance the state between spikes and to determine the release on a spike.
pub trait ReleaseDraw {
    /// Let the state evolve during the `dt` seconds elapsed since the previous spike.
    fn recover(&mut self, state: &mut SimulationState, dt: f64, params: &SynapseParams);

    /// Determine the release on a spike, given the current state.
    /// The state itself is updated by the caller.
    fn release(&mut self, state: &SimulationState, params: &SynapseParams) -> Release;
}

/// Deterministic draw returning expectations.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectedRelease;

impl ReleaseDraw for ExpectedRelease {
    fn recover(&mut self, state: &mut SimulationState, dt: f64, params: &SynapseParams) {
        state.relax(dt, params);
    }

    fn release(&mut self, state: &SimulationState, params: &SynapseParams) -> Release {
        let sites =
            params.n_release_sites as f64 * state.availability * state.release_probability;
        Release {
            sites,
            amplitude: sites * params.quantal_amplitude,
        }
    }
}

/// Stochastic draw over discrete release sites.
pub struct SampledRelease<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    noise: Normal<f64>,
    available_sites: u64,
}

impl<'a, R: Rng + ?Sized> SampledRelease<'a, R> {
    /// Create a draw for a rested synapse, with every site available.
    pub fn new(params: &SynapseParams, noise: Normal<f64>, rng: &'a mut R) -> Self {
        SampledRelease {
            rng,
            noise,
            available_sites: params.n_release_sites as u64,
        }
    }

    /// Returns the number of sites currently available.
    pub fn available_sites(&self) -> u64 {
        self.available_sites
    }
}

impl<'a, R: Rng + ?Sized> ReleaseDraw for SampledRelease<'a, R> {
    fn recover(&mut self, state: &mut SimulationState, dt: f64, params: &SynapseParams) {
        let n = params.n_release_sites as u64;
        let depleted = n - self.available_sites;
        let refill_probability = 1.0 - decay_factor(dt, params.depression_recovery_tau);
        self.available_sites += binomial(depleted, refill_probability, self.rng);

        // The release probability evolves deterministically, availability follows the sites.
        state.relax(dt, params);
        state.availability = self.available_sites as f64 / n as f64;
    }

    fn release(&mut self, state: &SimulationState, params: &SynapseParams) -> Release {
        let released = binomial(self.available_sites, state.release_probability, self.rng);
        self.available_sites -= released;

        let amplitude = quantal_sum(
            released,
            params.quantal_amplitude,
            params.quantal_amplitude_cv,
            self.rng,
        ) + self.noise.sample(self.rng);

        Release {
            sites: released as f64,
            amplitude,
        }
    }
}

/// Draw the number of successes among `n` independent trials with success probability `p`.
/// The probability is clamped to [0, 1].
pub fn binomial<R: Rng + ?Sized>(n: u64, p: f64, rng: &mut R) -> u64 {
    if n == 0 || !(p > 0.0) {
        return 0;
    }
    if p >= 1.0 {
        return n;
    }
    // Cannot fail: p lies in (0, 1).
    Binomial::new(n, p).map_or(0, |binomial| binomial.sample(rng))
}

/// Draw the summed amplitude of `num_quanta` independent quanta with the given mean and
/// coefficient of variation.
///
/// Quanta are Gamma distributed, so that their sum is again Gamma distributed and has the
/// sign of the mean amplitude.
pub fn quantal_sum<R: Rng + ?Sized>(num_quanta: u64, mean: f64, cv: f64, rng: &mut R) -> f64 {
    if num_quanta == 0 {
        return 0.0;
    }

    let expected = num_quanta as f64 * mean;
    if cv <= 0.0 || mean == 0.0 {
        return expected;
    }

    let shape = num_quanta as f64 / (cv * cv);
    let scale = mean.abs() * cv * cv;
    // A vanishing cv underflows cv^2: the quanta are then deterministic.
    if !shape.is_finite() || !(scale > 0.0) {
        return expected;
    }
    Gamma::new(shape, scale).map_or(expected, |gamma| mean.signum() * gamma.sample(rng))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    const SEED: u64 = 42;

    fn params() -> SynapseParams {
        SynapseParams {
            n_release_sites: 10,
            base_release_probability: 0.2,
            facilitation_amount: 0.05,
            facilitation_tau: 0.2,
            depression_recovery_tau: 0.5,
            quantal_amplitude: 1.0,
            quantal_amplitude_cv: 0.2,
            noise_std: 0.0,
        }
    }

    #[test]
    fn test_expected_release() {
        let params = params();
        let state = SimulationState {
            availability: 0.5,
            release_probability: 0.4,
        };

        let release = ExpectedRelease.release(&state, &params);
        assert_relative_eq!(release.sites, 2.0, epsilon = 1e-12);
        assert_relative_eq!(release.amplitude, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_binomial() {
        let mut rng = StdRng::seed_from_u64(SEED);

        assert_eq!(binomial(0, 0.5, &mut rng), 0);
        assert_eq!(binomial(10, 0.0, &mut rng), 0);
        assert_eq!(binomial(10, f64::NAN, &mut rng), 0);
        assert_eq!(binomial(10, 1.0, &mut rng), 10);

        let num_draws = 10_000;
        let draws: Vec<u64> = (0..num_draws).map(|_| binomial(10, 0.3, &mut rng)).collect();
        assert!(draws.iter().all(|k| *k <= 10));
        let mean = draws.iter().sum::<u64>() as f64 / num_draws as f64;
        assert!((mean - 3.0).abs() < 0.1);
    }

    #[test]
    fn test_quantal_sum() {
        let mut rng = StdRng::seed_from_u64(SEED);

        assert_eq!(quantal_sum(0, 1.0, 0.2, &mut rng), 0.0);
        assert_eq!(quantal_sum(3, 0.5, 0.0, &mut rng), 1.5);
        assert_eq!(quantal_sum(3, 0.0, 0.2, &mut rng), 0.0);

        let num_draws = 10_000;
        let draws: Vec<f64> = (0..num_draws)
            .map(|_| quantal_sum(4, 0.5, 0.3, &mut rng))
            .collect();
        let mean = draws.iter().sum::<f64>() / num_draws as f64;
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / num_draws as f64;

        // Sum of 4 quanta: mean 2.0, variance 4 * (0.5 * 0.3)^2 = 0.09
        assert!((mean - 2.0).abs() < 0.02);
        assert!((var - 0.09).abs() < 0.01);
        assert!(draws.iter().all(|x| *x > 0.0));

        // Vanishing cv behaves as cv = 0
        assert_eq!(quantal_sum(3, 0.5, 1e-160, &mut rng), 1.5);
        assert_eq!(quantal_sum(3, 1e-300, 1e-50, &mut rng), 3.0 * 1e-300);

        // Inhibitory quanta are negative
        assert!((0..100).all(|_| quantal_sum(2, -0.5, 0.3, &mut rng) < 0.0));
    }

    #[test]
    fn test_sampled_release_sites() {
        let params = params();
        let mut rng = StdRng::seed_from_u64(SEED);
        let noise = Normal::new(0.0, 0.0).unwrap();
        let mut draw = SampledRelease::new(&params, noise, &mut rng);
        let mut state = SimulationState::rested(&params);
        state.release_probability = 1.0;

        // Every available site releases
        let release = draw.release(&state, &params);
        assert_eq!(release.sites, 10.0);
        assert_eq!(draw.available_sites(), 0);

        // Nothing left to release until sites refill
        let release = draw.release(&state, &params);
        assert_eq!(release.sites, 0.0);
        assert_eq!(release.amplitude, 0.0);

        draw.recover(&mut state, 0.0, &params);
        assert_eq!(draw.available_sites(), 0);
        assert_eq!(state.availability, 0.0);

        draw.recover(&mut state, 1e3, &params);
        assert_eq!(draw.available_sites(), 10);
        assert_eq!(state.availability, 1.0);
    }
}
