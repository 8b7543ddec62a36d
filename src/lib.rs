//! Packed-bed reactor model for the liquid-phase esterification of benzoic
//! acid with ethanol.
//!
//! Given a catalyst mass, a feed acid concentration and a temperature, the
//! crate integrates the species mass balances along the bed and returns the
//! concentration profile of acid, ethanol and water.
//!
//! ```rust,no_run
//! use pbr_esterification::{ReactionConditions, integrate};
//!
//! let conditions = ReactionConditions::with_default_flow(0.1, 1.358, 93.13)?;
//! let profile = integrate(&conditions, 0.01)?;
//! println!("final conversion {:.3}", profile.final_conversion());
//! # Ok::<(), pbr_esterification::PbrError>(())
//! ```
//!
//! - [`kinetics`]: the rate law and its derivatives per gram of catalyst
//! - [`integrator`]: the profile along the bed
//! - [`conditions`]: validated run inputs
//! - [`history`] and [`session`]: the last two runs, kept by the caller
//! - [`output`]: tables, JSON and gnuplot charts

pub mod conditions;
pub mod error;
pub mod history;
pub mod integrator;
pub mod kinetics;
pub mod output;
pub mod session;

pub use conditions::{DEFAULT_VOLUMETRIC_FLOW, ReactionConditions, ReactionInputs};
pub use error::{PbrError, Result};
pub use history::RunHistory;
pub use integrator::{
    IntegratorSettings, Sample, SolverMethod, Trajectory, integrate, integrate_with,
};
pub use kinetics::{ConcentrationState, KineticParameters, rate_and_derivatives};
pub use session::{RunSettings, run_from_text, run_into_history};
