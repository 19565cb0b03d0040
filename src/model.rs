//! The stochastic release model of a single synapse.
//!
//! A [`ReleaseModel`] owns the immutable parameters of a synapse. Each call to
//! [`ReleaseModel::run`] starts from the rested state, processes the spikes in order, and
//! discards its state on return, so one model can serve any number of independent runs,
//! possibly concurrently.
//!
//! For every spike:
//! 1. the state relaxes during the interval elapsed since the previous spike;
//! 2. the number of releasing sites is determined from availability and release probability;
//! 3. the amplitude is computed from the released quanta;
//! 4. the released sites are depleted and the release probability is facilitated.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use stochastic_release::model::{Mode, ReleaseModel};
//! use stochastic_release::params::SynapseParams;
//!
//! let params = SynapseParams {
//!     n_release_sites: 10,
//!     base_release_probability: 0.2,
//!     facilitation_amount: 0.05,
//!     facilitation_tau: 0.2,
//!     depression_recovery_tau: 0.5,
//!     quantal_amplitude: 1.0,
//!     quantal_amplitude_cv: 0.2,
//!     noise_std: 0.0,
//! };
//! let model = ReleaseModel::build(params).unwrap();
//!
//! let spike_times = [0.1, 0.11, 0.12, 0.14];
//! let expected = model.run_expected(&spike_times).unwrap();
//! assert_eq!(expected.len(), 4);
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let sampled = model.run(&spike_times, Mode::Sampled, &mut rng).unwrap();
//! assert_eq!(sampled.len(), 4);
//! ```
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::error::ReleaseError;
use crate::params::SynapseParams;
use crate::release::{ExpectedRelease, ReleaseDraw, SampledRelease};
use crate::spike_train::SpikeTrain;
use crate::state::SimulationState;

/// The simulation mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Mode {
    /// Deterministic propagation of expectations.
    Expected,
    /// One stochastic realization.
    Sampled,
}

/// The outcome of one run, with one entry per input spike (in the same order).
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct RunResult {
    /// The PSP amplitudes.
    pub amplitudes: Vec<f64>,
    /// The number of releasing sites (an expectation in expected mode).
    pub released_sites: Vec<f64>,
    /// The availability right before each release.
    pub availability: Vec<f64>,
    /// The release probability right before each release.
    pub release_probability: Vec<f64>,
}

impl RunResult {
    fn with_capacity(capacity: usize) -> Self {
        RunResult {
            amplitudes: Vec::with_capacity(capacity),
            released_sites: Vec::with_capacity(capacity),
            availability: Vec::with_capacity(capacity),
            release_probability: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of spikes in the run.
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Returns true if the run has no spike.
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Returns the amplitudes relative to the first one, e.g., the paired-pulse ratio at index 1.
    /// Returns `None` if the first amplitude is zero.
    pub fn relative_amplitudes(&self) -> Option<Vec<f64>> {
        match self.amplitudes.first() {
            Some(&first) if first != 0.0 => {
                Some(self.amplitudes.iter().map(|a| a / first).collect())
            }
            _ => None,
        }
    }
}

/// A synapse releasing vesicles stochastically, with short-term facilitation and depression.
#[derive(Debug, Clone)]
pub struct ReleaseModel {
    params: SynapseParams,
    noise: Normal<f64>,
}

impl ReleaseModel {
    /// Create a new model from the provided parameters.
    /// The function returns an error if the parameters are invalid.
    pub fn build(params: SynapseParams) -> Result<Self, ReleaseError> {
        params.validate()?;
        let noise = Normal::new(0.0, params.noise_std)
            .map_err(|e| ReleaseError::InvalidParameter(format!("Invalid noise: {}", e)))?;
        Ok(ReleaseModel { params, noise })
    }

    /// Returns the parameters of the synapse.
    pub fn params(&self) -> &SynapseParams {
        &self.params
    }

    /// Simulate the response to the provided spike times.
    ///
    /// The random source is only used in sampled mode. The function returns an error if the
    /// spike times are empty, not finite, or decreasing (equal times are distinct spikes).
    pub fn run<R: Rng + ?Sized>(
        &self,
        spike_times: &[f64],
        mode: Mode,
        rng: &mut R,
    ) -> Result<RunResult, ReleaseError> {
        let spike_train = SpikeTrain::build(spike_times)?;
        Ok(self.run_spike_train(&spike_train, mode, rng))
    }

    /// Simulate the expected response to the provided spike times.
    pub fn run_expected(&self, spike_times: &[f64]) -> Result<RunResult, ReleaseError> {
        let spike_train = SpikeTrain::build(spike_times)?;
        Ok(self.simulate(&spike_train, ExpectedRelease))
    }

    /// Simulate the response to an already validated spike train.
    pub fn run_spike_train<R: Rng + ?Sized>(
        &self,
        spike_train: &SpikeTrain,
        mode: Mode,
        rng: &mut R,
    ) -> RunResult {
        log::debug!(
            "Running {:?} simulation over {} spikes",
            mode,
            spike_train.len()
        );
        match mode {
            Mode::Expected => self.simulate(spike_train, ExpectedRelease),
            Mode::Sampled => self.simulate(
                spike_train,
                SampledRelease::new(&self.params, self.noise, rng),
            ),
        }
    }

    fn simulate<D: ReleaseDraw>(&self, spike_train: &SpikeTrain, mut draw: D) -> RunResult {
        let n = self.params.n_release_sites as f64;
        let mut state = SimulationState::rested(&self.params);
        let mut result = RunResult::with_capacity(spike_train.len());
        let mut last_time: Option<f64> = None;

        for &t in spike_train.times() {
            if let Some(last_time) = last_time {
                draw.recover(&mut state, t - last_time, &self.params);
            }
            last_time = Some(t);

            result.availability.push(state.availability);
            result.release_probability.push(state.release_probability);

            let release = draw.release(&state, &self.params);
            state.deplete(release.sites / n);
            state.facilitate(&self.params);

            log::trace!(
                "t={}: {} sites released, amplitude {}, next state {:?}",
                t,
                release.sites,
                release.amplitude,
                state
            );

            result.released_sites.push(release.sites);
            result.amplitudes.push(release.amplitude);
        }

        result
    }
}
