//! Presynaptic spike trains driving the release model.
//!
//! A spike train is a non-empty sequence of finite, non-decreasing timestamps (in seconds).
//! Equal consecutive timestamps are accepted: they are simultaneous but distinct spikes,
//! separated by zero elapsed time.
//!
//! # Examples
//!
//! ```
//! use stochastic_release::spike_train::SpikeTrain;
//!
//! let spike_train = SpikeTrain::induction_recovery(50.0, 0.25, 0.0).unwrap();
//! assert_eq!(spike_train.len(), 12);
//! assert!(SpikeTrain::build(&[0.2, 0.1]).is_err());
//! ```
use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

use crate::error::ReleaseError;

/// Number of pulses in the induction phase of a standard plasticity stimulus.
pub const NUM_INDUCTION_PULSES: usize = 8;
/// Number of pulses in the recovery phase of a standard plasticity stimulus.
pub const NUM_RECOVERY_PULSES: usize = 4;

/// A validated sequence of presynaptic spike times.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(try_from = "SpikeTrainData")]
pub struct SpikeTrain {
    times: Vec<f64>,
}

/// Unvalidated serialized form of a spike train.
#[derive(Deserialize)]
struct SpikeTrainData {
    times: Vec<f64>,
}

impl TryFrom<SpikeTrainData> for SpikeTrain {
    type Error = ReleaseError;

    fn try_from(data: SpikeTrainData) -> Result<Self, Self::Error> {
        SpikeTrain::build(&data.times)
    }
}

impl SpikeTrain {
    /// Create a spike train from the provided timestamps.
    /// The function returns an error if the timestamps are empty, not finite, or decreasing.
    pub fn build(times: &[f64]) -> Result<Self, ReleaseError> {
        if times.is_empty() {
            return Err(ReleaseError::InvalidInput(
                "Spike train must contain at least one spike".to_string(),
            ));
        }

        if let Some(t) = times.iter().find(|t| !t.is_finite()) {
            return Err(ReleaseError::InvalidInput(format!(
                "Spike times must be finite, got {}",
                t
            )));
        }

        if let Some((t1, t2)) = times.iter().tuple_windows().find(|(t1, t2)| t2 < t1) {
            return Err(ReleaseError::InvalidInput(format!(
                "Spike times must be non-decreasing, got {} followed by {}",
                t1, t2
            )));
        }

        Ok(SpikeTrain {
            times: times.to_vec(),
        })
    }

    /// Create a regular spike train with `num_spikes` spikes at the given frequency (in Hz).
    pub fn periodic(num_spikes: usize, frequency: f64, start: f64) -> Result<Self, ReleaseError> {
        if !(frequency > 0.0 && frequency.is_finite()) {
            return Err(ReleaseError::InvalidInput(format!(
                "Frequency must be positive and finite, got {}",
                frequency
            )));
        }

        let times: Vec<f64> = (0..num_spikes)
            .map(|n| start + n as f64 / frequency)
            .collect();
        SpikeTrain::build(&times)
    }

    /// Create the standard short-term plasticity stimulus: a train of induction pulses at the
    /// given frequency, followed by recovery pulses (at the same frequency) starting
    /// `recovery_delay` seconds after the last induction pulse.
    pub fn induction_recovery(
        frequency: f64,
        recovery_delay: f64,
        start: f64,
    ) -> Result<Self, ReleaseError> {
        if !(recovery_delay >= 0.0) {
            return Err(ReleaseError::InvalidInput(format!(
                "Recovery delay must be non-negative, got {}",
                recovery_delay
            )));
        }

        let induction = SpikeTrain::periodic(NUM_INDUCTION_PULSES, frequency, start)?;
        let recovery_start = induction.times[NUM_INDUCTION_PULSES - 1] + recovery_delay;
        let recovery = SpikeTrain::periodic(NUM_RECOVERY_PULSES, frequency, recovery_start)?;

        let times: Vec<f64> = induction
            .times
            .into_iter()
            .chain(recovery.times)
            .collect();
        SpikeTrain::build(&times)
    }

    /// Sample a homogeneous Poisson spike train with the given rate (in Hz) on `[0, duration)`.
    /// The function returns an error if no spike falls in the interval.
    pub fn rand<R: Rng + ?Sized>(
        rate: f64,
        duration: f64,
        rng: &mut R,
    ) -> Result<Self, ReleaseError> {
        if !(duration > 0.0 && duration.is_finite()) {
            return Err(ReleaseError::InvalidInput(format!(
                "Duration must be positive and finite, got {}",
                duration
            )));
        }

        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ReleaseError::InvalidInput(format!(
                "Firing rate must be positive and finite, got {}",
                rate
            )));
        }

        let isi = Exp::new(rate).map_err(|e| {
            ReleaseError::InvalidInput(format!("Invalid firing rate {}: {}", rate, e))
        })?;

        let mut times = vec![];
        let mut t = isi.sample(rng);
        while t < duration {
            times.push(t);
            t += isi.sample(rng);
        }

        log::debug!("Sampled {} spikes at {} Hz over {} s", times.len(), rate, duration);
        SpikeTrain::build(&times)
    }

    /// Returns the spike times.
    pub fn times(&self) -> &[f64] {
        &self.times[..]
    }

    /// Returns the number of spikes.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false, a spike train holds at least one spike.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the intervals between consecutive spikes.
    pub fn intervals(&self) -> Vec<f64> {
        self.times
            .iter()
            .tuple_windows()
            .map(|(t1, t2)| t2 - t1)
            .collect()
    }

    /// Returns the time elapsed between the first and the last spike.
    pub fn duration(&self) -> f64 {
        self.times[self.times.len() - 1] - self.times[0]
    }
}
