//! Repeated independent trials of the release model.
//!
//! Trials are independent runs over the same spike train. They are distributed over the rayon
//! thread pool, each with its own random source seeded from the batch seed and the trial index,
//! so that the outcome does not depend on the number of threads.
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ReleaseError;
use crate::model::{Mode, ReleaseModel, RunResult};
use crate::spike_train::SpikeTrain;

/// Minimum number of trials to consider parallel processing.
pub const MIN_PARALLEL_TRIALS: usize = 16;

/// The results of a batch of independent trials over the same spike train.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TrialSet {
    results: Vec<RunResult>,
}

impl TrialSet {
    /// Returns the individual trial results.
    pub fn results(&self) -> &[RunResult] {
        &self.results[..]
    }

    /// Returns the number of trials.
    pub fn num_trials(&self) -> usize {
        self.results.len()
    }

    /// Returns the number of spikes per trial.
    pub fn num_spikes(&self) -> usize {
        self.results.first().map_or(0, |result| result.len())
    }

    /// Returns the mean amplitude of each spike across trials.
    pub fn mean_amplitudes(&self) -> Vec<f64> {
        self.mean_of(|result| &result.amplitudes)
    }

    /// Returns the (unbiased) standard deviation of the amplitude of each spike across trials.
    /// The deviation is zero when there is a single trial.
    pub fn std_amplitudes(&self) -> Vec<f64> {
        let means = self.mean_amplitudes();
        if self.num_trials() < 2 {
            return vec![0.0; means.len()];
        }

        let denominator = (self.num_trials() - 1) as f64;
        means
            .iter()
            .enumerate()
            .map(|(i, mean)| {
                let sum_sq = self
                    .results
                    .iter()
                    .map(|result| (result.amplitudes[i] - mean).powi(2))
                    .sum::<f64>();
                (sum_sq / denominator).sqrt()
            })
            .collect()
    }

    /// Returns the mean number of releasing sites of each spike across trials.
    pub fn mean_released_sites(&self) -> Vec<f64> {
        self.mean_of(|result| &result.released_sites)
    }

    fn mean_of<F>(&self, values: F) -> Vec<f64>
    where
        F: Fn(&RunResult) -> &Vec<f64>,
    {
        let num_trials = self.num_trials() as f64;
        (0..self.num_spikes())
            .map(|i| {
                self.results
                    .iter()
                    .map(|result| values(result)[i])
                    .sum::<f64>()
                    / num_trials
            })
            .collect()
    }
}

impl ReleaseModel {
    /// Run `num_trials` independent sampled trials over the provided spike times.
    ///
    /// Trial `i` draws from a `ChaCha8Rng` seeded with `seed + i`.
    /// The function returns an error if there is no trial or if the spike times are invalid.
    pub fn run_trials(
        &self,
        spike_times: &[f64],
        num_trials: usize,
        seed: u64,
    ) -> Result<TrialSet, ReleaseError> {
        if num_trials == 0 {
            return Err(ReleaseError::InvalidInput(
                "At least one trial is required".to_string(),
            ));
        }
        let spike_train = SpikeTrain::build(spike_times)?;

        log::info!(
            "Running {} trials over {} spikes...",
            num_trials,
            spike_train.len()
        );

        let run_trial = |trial: usize| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial as u64));
            self.run_spike_train(&spike_train, Mode::Sampled, &mut rng)
        };

        let results: Vec<RunResult> = if num_trials >= MIN_PARALLEL_TRIALS {
            (0..num_trials).into_par_iter().map(run_trial).collect()
        } else {
            (0..num_trials).map(run_trial).collect()
        };

        log::info!("{} trials completed successfully!", num_trials);
        Ok(TrialSet { results })
    }
}
