//! Operating conditions of one run and the validation boundary that builds
//! them from user input.

use crate::error::{PbrError, Result};
use crate::kinetics::ConcentrationState;

// --- Physical configuration ---

/// 15 mL/min in the flow unit the kinetic constants were fitted with.
pub const DEFAULT_VOLUMETRIC_FLOW: f64 = 15.0 / (60.0 * 1.0e6);
/// Ethanol fed per mole of acid. The rate law is only valid above 9:1.
pub const ETHANOL_EXCESS_RATIO: f64 = 9.0;
pub const KELVIN_OFFSET: f64 = 273.15;
pub const ABSOLUTE_ZERO_CELSIUS: f64 = -KELVIN_OFFSET;

/// Converts a flow given in mL/min with the same scaling as
/// [`DEFAULT_VOLUMETRIC_FLOW`].
pub fn flow_from_ml_per_min(ml_per_min: f64) -> f64 {
    ml_per_min / (60.0 * 1.0e6)
}

/// Validated conditions for a single reactor run.
///
/// Fields are private so a value can only exist once it passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionConditions {
    catalyst_mass: f64,
    initial_acid_concentration: f64,
    temperature_celsius: f64,
    volumetric_flow: f64,
}

impl ReactionConditions {
    pub fn new(
        catalyst_mass: f64,
        initial_acid_concentration: f64,
        temperature_celsius: f64,
        volumetric_flow: f64,
    ) -> Result<Self> {
        check_positive("catalyst mass", catalyst_mass)?;
        check_positive("initial acid concentration", initial_acid_concentration)?;
        if !temperature_celsius.is_finite() {
            return Err(PbrError::invalid("temperature", "must be a finite number"));
        }
        if temperature_celsius <= ABSOLUTE_ZERO_CELSIUS {
            return Err(PbrError::invalid(
                "temperature",
                format!("{temperature_celsius} °C is at or below absolute zero"),
            ));
        }
        check_positive("volumetric flow", volumetric_flow)?;

        Ok(ReactionConditions {
            catalyst_mass,
            initial_acid_concentration,
            temperature_celsius,
            volumetric_flow,
        })
    }

    /// Conditions at the default volumetric flow.
    pub fn with_default_flow(
        catalyst_mass: f64,
        initial_acid_concentration: f64,
        temperature_celsius: f64,
    ) -> Result<Self> {
        Self::new(
            catalyst_mass,
            initial_acid_concentration,
            temperature_celsius,
            DEFAULT_VOLUMETRIC_FLOW,
        )
    }

    pub fn catalyst_mass(&self) -> f64 {
        self.catalyst_mass
    }

    pub fn initial_acid_concentration(&self) -> f64 {
        self.initial_acid_concentration
    }

    pub fn temperature_celsius(&self) -> f64 {
        self.temperature_celsius
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature_celsius + KELVIN_OFFSET
    }

    pub fn volumetric_flow(&self) -> f64 {
        self.volumetric_flow
    }

    /// Feed composition: acid, ninefold ethanol, no water.
    pub fn initial_state(&self) -> ConcentrationState {
        ConcentrationState::new(
            self.initial_acid_concentration,
            ETHANOL_EXCESS_RATIO * self.initial_acid_concentration,
            0.0,
        )
    }
}

/// Raw text as typed by the user, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionInputs {
    pub catalyst_mass: String,
    pub initial_acid_concentration: String,
    pub temperature_celsius: String,
}

impl Default for ReactionInputs {
    fn default() -> Self {
        ReactionInputs {
            catalyst_mass: "0.1".to_string(),
            initial_acid_concentration: "1.358".to_string(),
            temperature_celsius: "93.13".to_string(),
        }
    }
}

impl ReactionInputs {
    pub fn new(
        catalyst_mass: impl Into<String>,
        initial_acid_concentration: impl Into<String>,
        temperature_celsius: impl Into<String>,
    ) -> Self {
        ReactionInputs {
            catalyst_mass: catalyst_mass.into(),
            initial_acid_concentration: initial_acid_concentration.into(),
            temperature_celsius: temperature_celsius.into(),
        }
    }

    /// Parses a whitespace-separated `mass acid temperature` line.
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [mass, acid, temperature] => Ok(ReactionInputs::new(*mass, *acid, *temperature)),
            _ => Err(PbrError::invalid(
                "run line",
                format!(
                    "expected `mass acid temperature`, got {} field(s)",
                    fields.len()
                ),
            )),
        }
    }

    /// Parses and validates every field; the first failing field is reported.
    pub fn parse(&self, volumetric_flow: f64) -> Result<ReactionConditions> {
        let mass = parse_number("catalyst mass", &self.catalyst_mass)?;
        let acid = parse_number(
            "initial acid concentration",
            &self.initial_acid_concentration,
        )?;
        let temperature = parse_number("temperature", &self.temperature_celsius)?;
        ReactionConditions::new(mass, acid, temperature, volumetric_flow)
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| PbrError::invalid(field, format!("`{trimmed}` is not a number")))?;
    if !value.is_finite() {
        return Err(PbrError::invalid(field, format!("`{trimmed}` is not finite")));
    }
    Ok(value)
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PbrError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ));
    }
    Ok(())
}
