//! Row-per-sample views of a profile: records, CSV, JSON and a fixed-width
//! text table.

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::integrator::Trajectory;

pub const MASS_HEADER: &str = "Catalyst (g)";
pub const ACID_HEADER: &str = "Benzoic acid (mol/uL)";
pub const ETHANOL_HEADER: &str = "Ethanol (mol/uL)";
pub const WATER_HEADER: &str = "Water (mol/uL)";

/// One sample of a profile as handed to presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileRecord {
    pub mass: f64,
    pub acid: f64,
    pub ethanol: f64,
    pub water: f64,
}

pub fn records(trajectory: &Trajectory) -> Vec<ProfileRecord> {
    trajectory
        .samples()
        .iter()
        .map(|s| ProfileRecord {
            mass: s.mass,
            acid: s.state.acid,
            ethanol: s.state.ethanol,
            water: s.state.water,
        })
        .collect()
}

/// Summary of a run alongside its records.
#[derive(Debug, Clone, Serialize)]
struct ProfileDocument {
    catalyst_mass: f64,
    initial_acid_concentration: f64,
    temperature_celsius: f64,
    volumetric_flow: f64,
    method: &'static str,
    final_conversion: f64,
    samples: Vec<ProfileRecord>,
}

pub fn to_json(trajectory: &Trajectory) -> Result<String> {
    let conditions = trajectory.conditions();
    let document = ProfileDocument {
        catalyst_mass: conditions.catalyst_mass(),
        initial_acid_concentration: conditions.initial_acid_concentration(),
        temperature_celsius: conditions.temperature_celsius(),
        volumetric_flow: conditions.volumetric_flow(),
        method: trajectory.method().label(),
        final_conversion: trajectory.final_conversion(),
        samples: records(trajectory),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn write_csv<W: Write>(trajectory: &Trajectory, precision: usize, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "{},{},{},{}",
        MASS_HEADER, ACID_HEADER, ETHANOL_HEADER, WATER_HEADER
    )?;
    for r in records(trajectory) {
        writeln!(
            out,
            "{:.p$},{:.p$},{:.p$},{:.p$}",
            r.mass,
            r.acid,
            r.ethanol,
            r.water,
            p = precision
        )?;
    }
    Ok(())
}

pub fn write_text_table<W: Write>(trajectory: &Trajectory, out: &mut W) -> Result<()> {
    let conditions = trajectory.conditions();
    writeln!(
        out,
        "W = {} g, C0 = {} mol/uL, T = {} °C ({})",
        conditions.catalyst_mass(),
        conditions.initial_acid_concentration(),
        conditions.temperature_celsius(),
        trajectory.method().label()
    )?;
    writeln!(
        out,
        "{:>12} {:>22} {:>18} {:>16}",
        MASS_HEADER, ACID_HEADER, ETHANOL_HEADER, WATER_HEADER
    )?;
    for r in records(trajectory) {
        writeln!(
            out,
            "{:>12.4} {:>22.6} {:>18.6} {:>16.6}",
            r.mass, r.acid, r.ethanol, r.water
        )?;
    }
    writeln!(out, "final conversion: {:.4}", trajectory.final_conversion())?;
    Ok(())
}
