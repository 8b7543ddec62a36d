/* Packed-bed reactor for the esterification of benzoic acid with
 ethanol.  Catalyst mass, feed acid concentration and temperature are
 read as text, checked, and the concentration profile along the bed is
 printed.  The two most recent runs are kept and can be overlaid on a
 gnuplot chart, the latest drawn with lines and the previous one with
 markers.

 With --interactive, each stdin line `mass acid temperature` is a new
 run of the same session. */

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::error;

use pbr_esterification::conditions::flow_from_ml_per_min;
use pbr_esterification::integrator::{DEFAULT_ABS_TOL, DEFAULT_MAX_STEPS, DEFAULT_REL_TOL};
use pbr_esterification::output::{OutputFormat, chart, write_trajectory};
use pbr_esterification::{
    IntegratorSettings, KineticParameters, ReactionInputs, Result, RunHistory, RunSettings,
    SolverMethod, run_into_history,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concentration profile of a packed-bed esterification reactor."
)]
struct Cli {
    /// Catalyst mass, g
    #[arg(long, default_value = "0.1")]
    mass: String,

    /// Feed benzoic acid concentration, mol/uL
    #[arg(long, default_value = "1.358")]
    acid: String,

    /// Temperature, °C
    #[arg(long, default_value = "93.13", allow_hyphen_values = true)]
    temperature: String,

    /// Catalyst mass between reported samples, g
    #[arg(long, default_value_t = 0.01)]
    grid_step: f64,

    /// Volumetric flow, mL/min
    #[arg(long, default_value_t = 15.0)]
    flow_ml_min: f64,

    #[arg(long, value_enum, ignore_case = true, default_value_t = MethodArg::Radau5)]
    method: MethodArg,

    #[arg(long, default_value_t = DEFAULT_REL_TOL)]
    rel_tol: f64,

    #[arg(long, default_value_t = DEFAULT_ABS_TOL)]
    abs_tol: f64,

    /// Step budget per grid interval
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    #[arg(long, value_enum, default_value_t = FormatArg::Table)]
    format: FormatArg,

    /// Save the overlay chart of the kept runs as SVG
    #[arg(long)]
    svg: Option<String>,

    /// Open the overlay chart in a gnuplot window
    #[arg(long)]
    show: bool,

    /// Read further `mass acid temperature` runs from stdin
    #[arg(long)]
    interactive: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    Radau5,
    Dopri5,
    Dopri8,
    Dop853,
}

impl From<MethodArg> for SolverMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Radau5 => SolverMethod::Radau5,
            MethodArg::Dopri5 => SolverMethod::DoPri5,
            MethodArg::Dopri8 => SolverMethod::DoPri8,
            MethodArg::Dop853 => SolverMethod::Dop853,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Table,
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    fn run_settings(&self) -> RunSettings {
        RunSettings {
            volumetric_flow: flow_from_ml_per_min(self.flow_ml_min),
            integrator: IntegratorSettings {
                grid_step: self.grid_step,
                method: self.method.into(),
                rel_tol: self.rel_tol,
                abs_tol: self.abs_tol,
                max_steps: self.max_steps,
                kinetics: KineticParameters::default(),
            },
        }
    }
}

// --- Presentation ---

fn present(cli: &Cli, history: &RunHistory) -> Result<()> {
    if let Some(latest) = history.latest() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_trajectory(latest, cli.format.into(), &mut out)?;
        out.flush()?;
    }
    if let Some(path) = &cli.svg {
        chart::save_svg(history, path)?;
    }
    if cli.show {
        chart::show(history)?;
    }
    Ok(())
}

fn run_once(
    cli: &Cli,
    settings: &RunSettings,
    inputs: &ReactionInputs,
    history: &mut RunHistory,
) -> Result<()> {
    run_into_history(inputs, settings, history)?;
    present(cli, history)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // 1. Session configuration, shared by every run
    let settings = cli.run_settings();
    let mut history = RunHistory::new();

    // 2. First run from the command line
    let inputs = ReactionInputs::new(
        cli.mass.as_str(),
        cli.acid.as_str(),
        cli.temperature.as_str(),
    );
    if let Err(e) = run_once(&cli, &settings, &inputs, &mut history) {
        error!("{e}");
        if !cli.interactive {
            return ExitCode::FAILURE;
        }
    }
    if !cli.interactive {
        return ExitCode::SUCCESS;
    }

    // 3. Further runs, one per line, until EOF
    eprintln!("enter `mass acid temperature` per run, Ctrl-D to quit");
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let result = ReactionInputs::from_line(&line)
            .and_then(|inputs| run_once(&cli, &settings, &inputs, &mut history));
        if let Err(e) = result {
            error!("{e}");
        }
    }
    ExitCode::SUCCESS
}
