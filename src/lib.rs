//! This crate provides a stochastic model of neurotransmitter release at a synapse.
//!
//! Given a presynaptic spike train and the biophysical parameters of a synapse, the model
//! produces one postsynaptic potential (PSP) amplitude per spike. The amplitudes reproduce
//! short-term plasticity (facilitation and depression) and, in sampled mode, the
//! trial-to-trial variability of quantal release.
//!
//! # Building a Model
//!
//! ```rust
//! use stochastic_release::model::ReleaseModel;
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
//! // Invalid parameters are rejected
//! let mut invalid = model.params().clone();
//! invalid.base_release_probability = 1.5;
//! assert!(ReleaseModel::build(invalid).is_err());
//! ```
//!
//! # Simulating Responses
//!
//! ```rust
//! use stochastic_release::model::ReleaseModel;
//! use stochastic_release::params::SynapseParams;
//! use stochastic_release::spike_train::SpikeTrain;
//!
//! let params = SynapseParams {
//!     n_release_sites: 10,
//!     base_release_probability: 0.5,
//!     facilitation_amount: 0.0,
//!     facilitation_tau: 0.1,
//!     depression_recovery_tau: 1.0,
//!     quantal_amplitude: 0.1,
//!     quantal_amplitude_cv: 0.3,
//!     noise_std: 0.02,
//! };
//! let model = ReleaseModel::build(params).unwrap();
//!
//! // A depressing synapse driven at 50 Hz
//! let spike_train = SpikeTrain::induction_recovery(50.0, 0.25, 0.0).unwrap();
//! let expected = model.run_expected(spike_train.times()).unwrap();
//! assert!(expected.amplitudes[7] < expected.amplitudes[0]);
//!
//! // Mean response over 500 independent trials
//! let trials = model.run_trials(spike_train.times(), 500, 42).unwrap();
//! assert_eq!(trials.mean_amplitudes().len(), 12);
//! ```

pub mod error;
pub mod model;
pub mod params;
pub mod release;
pub mod spike_train;
pub mod state;
pub mod trials;
