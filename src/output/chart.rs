//! Overlay chart of the runs kept in a [`RunHistory`].
//!
//! The latest run is drawn with lines, the previous one with markers, each as
//! two series: remaining acid and formed product (water) against catalyst
//! mass.

use gnuplot::*;
use log::debug;

use crate::error::{PbrError, Result};
use crate::history::RunHistory;
use crate::output::table::MASS_HEADER;

pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 600;

const Y_LABEL: &str = "Concentration (mol/uL)";
const PREVIOUS_SUFFIX: &str = " (previous)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Lines,
    Markers,
}

/// One curve on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub style: SeriesStyle,
    pub masses: Vec<f64>,
    pub values: Vec<f64>,
}

/// Series for every run in `history`, oldest first.
pub fn overlay_series(history: &RunHistory) -> Vec<Series> {
    let last = history.len().saturating_sub(1);
    let mut series = Vec::with_capacity(2 * history.len());

    for (i, run) in history.iter().enumerate() {
        let (style, suffix) = if i == last {
            (SeriesStyle::Lines, "")
        } else {
            (SeriesStyle::Markers, PREVIOUS_SUFFIX)
        };
        let masses: Vec<f64> = run.masses().collect();

        series.push(Series {
            label: format!("Benzoic acid{suffix}"),
            style,
            masses: masses.clone(),
            values: run.acid().collect(),
        });
        series.push(Series {
            label: format!("Water{suffix}"),
            style,
            masses,
            values: run.water().collect(),
        });
    }
    series
}

fn build_figure(history: &RunHistory) -> Result<Figure> {
    if history.is_empty() {
        return Err(PbrError::Render("no runs to plot".to_string()));
    }

    let mut fg = Figure::new();
    let axes = fg
        .axes2d()
        .set_title("Packed-bed esterification profile", &[])
        .set_x_label(MASS_HEADER, &[])
        .set_y_label(Y_LABEL, &[]);

    for s in overlay_series(history) {
        match s.style {
            SeriesStyle::Lines => {
                axes.lines(&s.masses, &s.values, &[Caption(s.label.as_str()), LineWidth(2.0)]);
            }
            SeriesStyle::Markers => {
                axes.points(&s.masses, &s.values, &[Caption(s.label.as_str()), PointSymbol('O')]);
            }
        }
    }
    Ok(fg)
}

/// Writes the overlay chart as SVG. Needs a `gnuplot` executable.
pub fn save_svg(history: &RunHistory, path: &str) -> Result<()> {
    let mut fg = build_figure(history)?;
    fg.save_to_svg(path, CHART_WIDTH, CHART_HEIGHT)
        .map_err(|e| PbrError::Render(e.to_string()))?;
    debug!("chart with {} run(s) written to {path}", history.len());
    Ok(())
}

/// Opens the overlay chart in a gnuplot window.
pub fn show(history: &RunHistory) -> Result<()> {
    let mut fg = build_figure(history)?;
    fg.show_and_keep_running()
        .map_err(|e| PbrError::Render(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ReactionConditions;
    use crate::integrator::integrate;

    fn push_run(history: &mut RunHistory, temperature: f64) {
        let conditions = ReactionConditions::with_default_flow(0.05, 1.358, temperature).unwrap();
        history.push(integrate(&conditions, 0.01).unwrap());
    }

    #[test]
    fn test_single_run_is_drawn_with_lines() {
        let mut history = RunHistory::new();
        push_run(&mut history, 93.13);

        let series = overlay_series(&history);
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|s| s.style == SeriesStyle::Lines));
        assert_eq!(series[0].label, "Benzoic acid");
        assert_eq!(series[1].label, "Water");
        assert_eq!(series[0].masses.len(), series[0].values.len());
    }

    #[test]
    fn test_previous_run_is_drawn_with_markers() {
        let mut history = RunHistory::new();
        push_run(&mut history, 80.0);
        push_run(&mut history, 100.0);

        let series = overlay_series(&history);
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].style, SeriesStyle::Markers);
        assert_eq!(series[0].label, "Benzoic acid (previous)");
        assert_eq!(series[3].style, SeriesStyle::Lines);
        assert_eq!(series[3].label, "Water");
        // hotter latest run consumes more acid
        assert!(series[2].values.last() < series[0].values.last());
    }

    #[test]
    fn test_empty_history_cannot_be_plotted() {
        let history = RunHistory::new();
        assert!(overlay_series(&history).is_empty());
        assert!(matches!(build_figure(&history), Err(PbrError::Render(_))));
    }
}
