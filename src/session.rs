//! Run orchestration: user text in, validated conditions, a profile, and the
//! caller's history updated.

use log::debug;

use crate::conditions::{DEFAULT_VOLUMETRIC_FLOW, ReactionInputs};
use crate::error::Result;
use crate::history::RunHistory;
use crate::integrator::{IntegratorSettings, Trajectory, integrate_with};

/// Configuration shared by every run of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSettings {
    pub volumetric_flow: f64,
    pub integrator: IntegratorSettings,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            volumetric_flow: DEFAULT_VOLUMETRIC_FLOW,
            integrator: IntegratorSettings::default(),
        }
    }
}

/// Validates `inputs` and integrates them. Nothing is attempted when the
/// inputs or the integrator settings are invalid.
pub fn run_from_text(inputs: &ReactionInputs, settings: &RunSettings) -> Result<Trajectory> {
    let conditions = inputs.parse(settings.volumetric_flow)?;
    integrate_with(&conditions, &settings.integrator)
}

/// Runs `inputs` and appends the profile to `history`, where it becomes
/// [`RunHistory::latest`].
///
/// On error the history is left untouched.
pub fn run_into_history(
    inputs: &ReactionInputs,
    settings: &RunSettings,
    history: &mut RunHistory,
) -> Result<()> {
    let trajectory = run_from_text(inputs, settings)?;
    if let Some(evicted) = history.push(trajectory) {
        debug!(
            "evicted run at {} °C from history",
            evicted.conditions().temperature_celsius()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PbrError;

    #[test]
    fn test_invalid_input_leaves_history_untouched() {
        let mut history = RunHistory::new();
        let settings = RunSettings::default();

        run_into_history(&ReactionInputs::default(), &settings, &mut history).unwrap();
        assert_eq!(history.len(), 1);

        let cold = ReactionInputs::new("0.1", "1.358", "-300");
        let result = run_into_history(&cold, &settings, &mut history);
        assert!(matches!(
            result,
            Err(PbrError::InvalidInput { field: "temperature", .. })
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_invalid_integrator_settings_are_rejected() {
        let mut history = RunHistory::new();
        let settings = RunSettings {
            integrator: IntegratorSettings {
                max_steps: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        let result = run_into_history(&ReactionInputs::default(), &settings, &mut history);
        assert!(matches!(
            result,
            Err(PbrError::InvalidInput { field: "max steps", .. })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_runs_accumulate_up_to_two() {
        let mut history = RunHistory::new();
        let settings = RunSettings::default();

        for temperature in ["80", "90", "100"] {
            let inputs = ReactionInputs::new("0.05", "1.358", temperature);
            run_into_history(&inputs, &settings, &mut history).unwrap();
            let latest = history.latest().unwrap();
            assert_eq!(latest.conditions().temperature_celsius().to_string(), temperature);
        }
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_flow_is_passed_through() {
        let settings = RunSettings {
            volumetric_flow: 2.0 * DEFAULT_VOLUMETRIC_FLOW,
            ..Default::default()
        };
        let fast = run_from_text(&ReactionInputs::default(), &settings).unwrap();
        let slow = run_from_text(&ReactionInputs::default(), &RunSettings::default()).unwrap();

        assert_eq!(fast.conditions().volumetric_flow(), 2.0 * DEFAULT_VOLUMETRIC_FLOW);
        assert!(fast.final_sample().state.acid > slow.final_sample().state.acid);
    }
}
