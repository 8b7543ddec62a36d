//! Concentration profile along the catalyst bed.
//!
//! The mass balance `dC/dW = ±r/q` is integrated from `W = 0` to the
//! catalyst mass of the run, one grid interval at a time, so that every
//! reported sample is an exact solver end point rather than an interpolation.
//! A solver failure is reported with the mass at the start of the interval
//! that could not be completed and no partial profile is returned.

use log::{debug, info, warn};
use ode_solvers::{Dop853, OutputType};
use russell_lab::Vector;
use russell_ode::{Method, OdeSolver, Params, System};

use crate::conditions::{ReactionConditions, check_positive};
use crate::error::{PbrError, Result};
use crate::kinetics::{ConcentrationState, KineticParameters, N_SPECIES};

// --- Grid and tolerance defaults ---

/// Grid step used for display, grams of catalyst.
pub const DISPLAY_GRID_STEP: f64 = 0.01;
/// Fine grid step, grams of catalyst.
pub const FINE_GRID_STEP: f64 = 0.001;
pub const DEFAULT_REL_TOL: f64 = 1.0e-8;
pub const DEFAULT_ABS_TOL: f64 = 1.0e-10;
/// Step budget for a single grid interval.
pub const DEFAULT_MAX_STEPS: usize = 100_000;
/// Upper bound on the samples of one profile.
pub const MAX_GRID_SAMPLES: usize = 1_000_000;

// mass/step ratios closer than this to an integer are taken as that integer
const GRID_SNAP: f64 = 1.0e-9;

// Dop853 step controller, the crate's own defaults
const DOP853_SAFETY: f64 = 0.9;
const DOP853_BETA: f64 = 0.0;
const DOP853_FAC_MIN: f64 = 0.333;
const DOP853_FAC_MAX: f64 = 6.0;
const DOP853_N_STIFF: u32 = 1000;

/// ODE method used to advance the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverMethod {
    /// Implicit Radau IIA of order 5 with a numerical Jacobian.
    #[default]
    Radau5,
    /// Dormand-Prince 5(4).
    DoPri5,
    /// Dormand-Prince 8(5,3).
    DoPri8,
    /// Dormand-Prince 8(5,3) from the `ode_solvers` crate.
    Dop853,
}

impl SolverMethod {
    pub fn label(&self) -> &'static str {
        match self {
            SolverMethod::Radau5 => "Radau5",
            SolverMethod::DoPri5 => "DoPri5",
            SolverMethod::DoPri8 => "DoPri8",
            SolverMethod::Dop853 => "Dop853",
        }
    }
}

/// Everything about a run that is numerics rather than chemistry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    pub grid_step: f64,
    pub method: SolverMethod,
    pub rel_tol: f64,
    pub abs_tol: f64,
    /// Step budget per grid interval.
    pub max_steps: usize,
    pub kinetics: KineticParameters,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        IntegratorSettings {
            grid_step: DISPLAY_GRID_STEP,
            method: SolverMethod::default(),
            rel_tol: DEFAULT_REL_TOL,
            abs_tol: DEFAULT_ABS_TOL,
            max_steps: DEFAULT_MAX_STEPS,
            kinetics: KineticParameters::default(),
        }
    }
}

impl IntegratorSettings {
    pub fn with_grid_step(grid_step: f64) -> Self {
        IntegratorSettings {
            grid_step,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("grid step", self.grid_step)?;
        check_positive("relative tolerance", self.rel_tol)?;
        check_positive("absolute tolerance", self.abs_tol)?;
        if self.max_steps == 0 {
            return Err(PbrError::invalid("max steps", "must be at least 1"));
        }
        Ok(())
    }
}

/// One grid point of the profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub mass: f64,
    pub state: ConcentrationState,
    /// Volumetric reaction rate evaluated at `state`.
    pub rate: f64,
}

/// Concentration profile of one run, starting at `W = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    conditions: ReactionConditions,
    method: SolverMethod,
    samples: Vec<Sample>,
}

impl Trajectory {
    pub fn conditions(&self) -> &ReactionConditions {
        &self.conditions
    }

    pub fn method(&self) -> SolverMethod {
        self.method
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn masses(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.mass)
    }

    pub fn acid(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.acid)
    }

    pub fn water(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.state.water)
    }

    /// Last sample; a trajectory always holds at least the feed.
    pub fn final_sample(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    /// Acid conversion `X = (C0 - C) / C0` at every sample.
    pub fn conversion(&self) -> impl Iterator<Item = f64> + '_ {
        let c0 = self.conditions.initial_acid_concentration();
        self.acid().map(move |c| (c0 - c) / c0)
    }

    pub fn final_conversion(&self) -> f64 {
        let c0 = self.conditions.initial_acid_concentration();
        (c0 - self.final_sample().state.acid) / c0
    }
}

/// Number of samples on the grid `0, step, 2·step, ...` strictly below
/// `catalyst_mass`, i.e. `ceil(catalyst_mass / grid_step)`, never less than 1.
pub fn grid_len(catalyst_mass: f64, grid_step: f64) -> usize {
    let ratio = catalyst_mass / grid_step;
    let nearest = ratio.round();
    let n = if nearest >= 1.0 && (ratio - nearest).abs() <= GRID_SNAP * nearest {
        nearest
    } else {
        ratio.ceil()
    };
    (n as usize).max(1)
}

/// Integrates the profile with default settings on a grid of `grid_step`.
pub fn integrate(conditions: &ReactionConditions, grid_step: f64) -> Result<Trajectory> {
    integrate_with(conditions, &IntegratorSettings::with_grid_step(grid_step))
}

/// Integrates the profile of `conditions` with explicit solver settings.
pub fn integrate_with(
    conditions: &ReactionConditions,
    settings: &IntegratorSettings,
) -> Result<Trajectory> {
    settings.validate()?;

    let ratio = conditions.catalyst_mass() / settings.grid_step;
    if !ratio.is_finite() || ratio > MAX_GRID_SAMPLES as f64 {
        return Err(PbrError::invalid(
            "grid step",
            format!(
                "{} g over {} g gives more than {MAX_GRID_SAMPLES} samples",
                conditions.catalyst_mass(),
                settings.grid_step
            ),
        ));
    }
    let n = grid_len(conditions.catalyst_mass(), settings.grid_step);
    let temperature = conditions.temperature_kelvin();
    let feed = conditions.initial_state();

    let mut samples = Vec::with_capacity(n);
    samples.push(Sample {
        mass: 0.0,
        state: feed,
        rate: settings.kinetics.rate(&feed, temperature),
    });

    let russell_method = match settings.method {
        SolverMethod::Radau5 => Some(Method::Radau5),
        SolverMethod::DoPri5 => Some(Method::DoPri5),
        SolverMethod::DoPri8 => Some(Method::DoPri8),
        SolverMethod::Dop853 => None,
    };
    match russell_method {
        Some(method) => advance_russell(method, conditions, settings, n, &mut samples)?,
        None => advance_dop853(conditions, settings, n, &mut samples)?,
    }

    if let Some(s) = samples.iter().find(|s| s.state.has_negative()) {
        warn!(
            "negative concentration at W = {} g: acid {:e}, ethanol {:e}, water {:e}",
            s.mass, s.state.acid, s.state.ethanol, s.state.water
        );
    }

    let trajectory = Trajectory {
        conditions: *conditions,
        method: settings.method,
        samples,
    };
    info!(
        "{} run: W = {} g, T = {} °C, {} samples, final conversion {:.4}",
        settings.method.label(),
        conditions.catalyst_mass(),
        conditions.temperature_celsius(),
        trajectory.len(),
        trajectory.final_conversion()
    );
    Ok(trajectory)
}

fn grid_mass(i: usize, grid_step: f64) -> f64 {
    i as f64 * grid_step
}

fn failure(mass: f64, reason: impl ToString) -> PbrError {
    PbrError::IntegrationFailure {
        mass,
        reason: reason.to_string(),
    }
}

fn push_sample(
    samples: &mut Vec<Sample>,
    mass: f64,
    state: ConcentrationState,
    kinetics: &KineticParameters,
    temperature_kelvin: f64,
) -> Result<()> {
    if !state.is_finite() {
        return Err(failure(mass, "solution is no longer finite"));
    }
    samples.push(Sample {
        mass,
        state,
        rate: kinetics.rate(&state, temperature_kelvin),
    });
    Ok(())
}

// --- russell_ode backend ---

/// Auxiliary values updated by the right-hand side during integration.
#[derive(Debug, Clone, Copy, Default)]
struct BedMonitor {
    evaluations: usize,
    rate: f64,
}

fn advance_russell(
    method: Method,
    conditions: &ReactionConditions,
    settings: &IntegratorSettings,
    n: usize,
    samples: &mut Vec<Sample>,
) -> Result<()> {
    let kinetics = settings.kinetics;
    let temperature = conditions.temperature_kelvin();
    let flow = conditions.volumetric_flow();

    // 1. Mass balance over the bed, W is the independent variable
    let system = System::new(N_SPECIES, move |dcdw, _w, c, monitor: &mut BedMonitor| {
        let state = ConcentrationState::new(c[0], c[1], c[2]);
        let (rate, d) = kinetics.rate_and_derivatives(&state, temperature, flow);
        monitor.evaluations += 1;
        monitor.rate = rate;

        dcdw[0] = d.acid;
        dcdw[1] = d.ethanol;
        dcdw[2] = d.water;
        Ok(())
    });

    // 2. Solver with error control
    let mut params = Params::new(method);
    params
        .set_tolerances(settings.abs_tol, settings.rel_tol, None)
        .map_err(|e| PbrError::invalid("tolerances", e))?;
    params.step.n_step_max = settings.max_steps;
    if method == Method::Radau5 {
        params.newton.use_numerical_jacobian = true;
    }
    let mut solver = OdeSolver::new(params, system).map_err(|e| failure(0.0, e))?;

    // 3. Feed composition
    let mut c = Vector::from(&samples[0].state.as_array());
    let mut monitor = BedMonitor::default();

    // 4. March along the grid
    for i in 1..n {
        let w0 = grid_mass(i - 1, settings.grid_step);
        let w1 = grid_mass(i, settings.grid_step);
        solver
            .solve(&mut c, w0, w1, None, &mut monitor, None)
            .map_err(|e| failure(w0, e))?;

        let state = ConcentrationState::new(c[0], c[1], c[2]);
        push_sample(samples, w1, state, &kinetics, temperature)?;
    }

    debug!(
        "{:?}: {} right-hand side evaluations, last rate {:e}",
        method, monitor.evaluations, monitor.rate
    );
    Ok(())
}

// --- ode_solvers backend ---

type State = ode_solvers::Vector3<f64>;

#[derive(Debug, Clone, Copy)]
struct PackedBed {
    kinetics: KineticParameters,
    temperature_kelvin: f64,
    volumetric_flow: f64,
}

impl ode_solvers::System<f64, State> for PackedBed {
    fn system(&self, _w: f64, c: &State, dc: &mut State) {
        let state = ConcentrationState::new(c[0], c[1], c[2]);
        let (_, d) =
            self.kinetics
                .rate_and_derivatives(&state, self.temperature_kelvin, self.volumetric_flow);
        dc[0] = d.acid;
        dc[1] = d.ethanol;
        dc[2] = d.water;
    }
}

fn advance_dop853(
    conditions: &ReactionConditions,
    settings: &IntegratorSettings,
    n: usize,
    samples: &mut Vec<Sample>,
) -> Result<()> {
    let bed = PackedBed {
        kinetics: settings.kinetics,
        temperature_kelvin: conditions.temperature_kelvin(),
        volumetric_flow: conditions.volumetric_flow(),
    };
    let feed = samples[0].state;
    let mut c = State::new(feed.acid, feed.ethanol, feed.water);
    let n_max = u32::try_from(settings.max_steps).unwrap_or(u32::MAX);
    let mut accepted = 0;

    for i in 1..n {
        let w0 = grid_mass(i - 1, settings.grid_step);
        let w1 = grid_mass(i, settings.grid_step);

        // sparse output: one (W, C) pair per accepted step, the last one at w1
        let mut stepper = Dop853::from_param(
            bed,
            w0,
            w1,
            w1 - w0,
            c,
            settings.rel_tol,
            settings.abs_tol,
            DOP853_SAFETY,
            DOP853_BETA,
            DOP853_FAC_MIN,
            DOP853_FAC_MAX,
            w1 - w0,
            0.0,
            n_max,
            DOP853_N_STIFF,
            OutputType::Sparse,
        );
        let stats = stepper.integrate().map_err(|e| failure(w0, e))?;
        accepted += stats.accepted_steps;

        let reached = stepper.x_out().last().copied().unwrap_or(w0);
        if (reached - w1).abs() > GRID_SNAP * w1 {
            return Err(failure(w0, format!("solver stopped at W = {reached} g")));
        }
        c = stepper
            .y_out()
            .last()
            .cloned()
            .ok_or_else(|| failure(w0, "solver produced no output"))?;

        let state = ConcentrationState::new(c[0], c[1], c[2]);
        push_sample(samples, w1, state, &bed.kinetics, bed.temperature_kelvin)?;
    }

    debug!("Dop853: {} accepted steps", accepted);
    Ok(())
}
