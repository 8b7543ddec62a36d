//! Rate law for the liquid-phase esterification of benzoic acid with ethanol
//! over a solid catalyst.
//!
//! The reaction is second order in the organics and inhibited by water
//! adsorbing on the catalyst surface:
//!
//! ```text
//! k = k0 · exp(-Ea / (R·T))
//! r = k · C_acid · C_ethanol / (1 + Kw · C_water)²
//! ```
//!
//! Integration runs over catalyst mass rather than time, so the volumetric
//! rate is divided by the volumetric flow `q` to obtain derivatives per gram
//! of catalyst.

// --- Kinetic constants ---

/// Pre-exponential factor, L²/(mol·s·g).
pub const PRE_EXPONENTIAL_FACTOR: f64 = 185.3;
/// Activation energy, J/mol.
pub const ACTIVATION_ENERGY: f64 = 68_800.0;
/// Ideal gas constant, J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.314;
/// Water adsorption (inhibition) constant.
pub const WATER_INHIBITION: f64 = 0.53;

/// Number of tracked species: acid, ethanol, water.
pub const N_SPECIES: usize = 3;

/// Arrhenius and inhibition constants of the rate law.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KineticParameters {
    pub k0: f64,
    pub ea: f64,
    pub r: f64,
    pub kw: f64,
}

impl Default for KineticParameters {
    fn default() -> Self {
        KineticParameters {
            k0: PRE_EXPONENTIAL_FACTOR,
            ea: ACTIVATION_ENERGY,
            r: GAS_CONSTANT,
            kw: WATER_INHIBITION,
        }
    }
}

/// Concentrations of (acid, ethanol, water) at one point of the bed.
///
/// Also used for the derivative vector d/dW of the same three species.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConcentrationState {
    pub acid: f64,
    pub ethanol: f64,
    pub water: f64,
}

impl ConcentrationState {
    pub fn new(acid: f64, ethanol: f64, water: f64) -> Self {
        ConcentrationState {
            acid,
            ethanol,
            water,
        }
    }

    pub fn as_array(&self) -> [f64; N_SPECIES] {
        [self.acid, self.ethanol, self.water]
    }

    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|c| c.is_finite())
    }

    /// True when any component is below zero. Not physical, but tolerated.
    pub fn has_negative(&self) -> bool {
        self.as_array().iter().any(|&c| c < 0.0)
    }
}

impl KineticParameters {
    /// Arrhenius rate constant at `temperature_kelvin`.
    pub fn rate_constant(&self, temperature_kelvin: f64) -> f64 {
        self.k0 * (-self.ea / (self.r * temperature_kelvin)).exp()
    }

    /// Volumetric reaction rate. Concentrations are used as given: a
    /// negative input yields a negative rate.
    pub fn rate(&self, state: &ConcentrationState, temperature_kelvin: f64) -> f64 {
        let k = self.rate_constant(temperature_kelvin);
        let inhibition = 1.0 + self.kw * state.water;
        k * state.acid * state.ethanol / (inhibition * inhibition)
    }

    /// Rate and per-species derivatives with respect to catalyst mass.
    ///
    /// `volumetric_flow` must be positive; it is divided by, not checked.
    pub fn rate_and_derivatives(
        &self,
        state: &ConcentrationState,
        temperature_kelvin: f64,
        volumetric_flow: f64,
    ) -> (f64, ConcentrationState) {
        let r = self.rate(state, temperature_kelvin);
        let per_mass = r / volumetric_flow;
        (r, ConcentrationState::new(-per_mass, -per_mass, per_mass))
    }
}

/// Rate law evaluated with the default kinetic constants.
pub fn rate_and_derivatives(
    state: &ConcentrationState,
    temperature_kelvin: f64,
    volumetric_flow: f64,
) -> (f64, ConcentrationState) {
    KineticParameters::default().rate_and_derivatives(state, temperature_kelvin, volumetric_flow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const Q: f64 = 15.0 / (60.0 * 1.0e6);

    #[test]
    fn test_rate_constant_matches_arrhenius() {
        let params = KineticParameters::default();
        let t = 366.28;
        let expected = 185.3 * (-68_800.0_f64 / (8.314 * t)).exp();
        assert_relative_eq!(params.rate_constant(t), expected, max_relative = 1e-12);
    }

    #[test]
    fn test_derivatives_are_stoichiometric() {
        let state = ConcentrationState::new(1.2, 10.5, 0.3);
        let (r, d) = rate_and_derivatives(&state, 360.0, Q);

        assert!(r > 0.0);
        assert_eq!(d.acid, d.ethanol);
        assert_eq!(d.acid, -d.water);
        assert_eq!(d.acid + d.water, 0.0);
        assert_relative_eq!(d.water, r / Q, max_relative = 1e-12);
    }

    #[test]
    fn test_water_inhibits_rate() {
        let params = KineticParameters::default();
        let dry = ConcentrationState::new(1.0, 9.0, 0.0);
        let wet = ConcentrationState::new(1.0, 9.0, 1.0);

        let ratio = params.rate(&wet, 350.0) / params.rate(&dry, 350.0);
        assert_relative_eq!(ratio, 1.0 / (1.53 * 1.53), max_relative = 1e-12);
    }

    #[test]
    fn test_rate_increases_with_temperature() {
        let params = KineticParameters::default();
        let state = ConcentrationState::new(0.8, 8.0, 0.5);

        let mut previous = 0.0;
        for t in [300.0, 330.0, 360.0, 390.0, 420.0] {
            let r = params.rate(&state, t);
            assert!(r > previous, "rate at {t} K not above the colder one");
            previous = r;
        }
    }

    #[test]
    fn test_negative_concentration_is_not_clamped() {
        let state = ConcentrationState::new(-1.0e-6, 9.0, 1.358);
        let (r, d) = rate_and_derivatives(&state, 366.28, Q);

        assert!(r < 0.0);
        assert!(d.acid > 0.0);
        assert!(d.water < 0.0);
    }

    #[test]
    fn test_zero_acid_gives_zero_rate() {
        let state = ConcentrationState::new(0.0, 9.0, 1.0);
        let (r, d) = rate_and_derivatives(&state, 366.28, Q);

        assert_eq!(r, 0.0);
        assert_eq!(d.water, 0.0);
    }
}
