//! Biophysical parameters of a single synapse.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::ReleaseError;

/// The fixed parameters of one synapse, as produced by an (external) fitting procedure.
///
/// Times are expressed in seconds and amplitudes in the unit of the recorded PSPs.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SynapseParams {
    /// The number of independent vesicle release sites at the terminal.
    pub n_release_sites: usize,
    /// The probability that an available site releases on a spike, absent facilitation.
    pub base_release_probability: f64,
    /// The increment applied to the release probability after each spike.
    pub facilitation_amount: f64,
    /// The time constant with which the release probability decays back to baseline.
    pub facilitation_tau: f64,
    /// The time constant with which depleted sites recover.
    pub depression_recovery_tau: f64,
    /// The mean PSP amplitude contributed by one released vesicle.
    /// Negative values describe inhibitory synapses.
    pub quantal_amplitude: f64,
    /// The coefficient of variation of the quantal amplitude.
    pub quantal_amplitude_cv: f64,
    /// The standard deviation of the additive measurement noise.
    #[serde(default)]
    pub noise_std: f64,
}

impl SynapseParams {
    /// Check that every parameter lies in its admissible range.
    ///
    /// Time constants must be positive (infinity is accepted and means no decay).
    pub fn validate(&self) -> Result<(), ReleaseError> {
        if self.n_release_sites < 1 {
            return Err(ReleaseError::InvalidParameter(
                "n_release_sites must be at least 1".to_string(),
            ));
        }

        if !(self.base_release_probability > 0.0 && self.base_release_probability <= 1.0) {
            return Err(ReleaseError::InvalidParameter(format!(
                "base_release_probability must be in (0, 1], got {}",
                self.base_release_probability
            )));
        }

        if !(0.0..=1.0).contains(&self.facilitation_amount) {
            return Err(ReleaseError::InvalidParameter(format!(
                "facilitation_amount must be in [0, 1], got {}",
                self.facilitation_amount
            )));
        }

        for (name, tau) in [
            ("facilitation_tau", self.facilitation_tau),
            ("depression_recovery_tau", self.depression_recovery_tau),
        ] {
            if !(tau > 0.0) {
                return Err(ReleaseError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, tau
                )));
            }
        }

        if !self.quantal_amplitude.is_finite() {
            return Err(ReleaseError::InvalidParameter(format!(
                "quantal_amplitude must be finite, got {}",
                self.quantal_amplitude
            )));
        }

        for (name, value) in [
            ("quantal_amplitude_cv", self.quantal_amplitude_cv),
            ("noise_std", self.noise_std),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ReleaseError::InvalidParameter(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Returns the expected amplitude of a spike arriving at a fully rested synapse.
    pub fn first_spike_amplitude(&self) -> f64 {
        self.n_release_sites as f64 * self.base_release_probability * self.quantal_amplitude
    }

    /// Save the parameters to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ReleaseError> {
        let file = File::create(path).map_err(|e| ReleaseError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| ReleaseError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| ReleaseError::IOError(e.to_string()))
    }

    /// Load (and validate) parameters from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ReleaseError> {
        let file = File::open(path).map_err(|e| ReleaseError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let params: SynapseParams =
            serde_json::from_reader(reader).map_err(|e| ReleaseError::IOError(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }
}
