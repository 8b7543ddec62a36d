use std::collections::VecDeque;

use crate::integrator::Trajectory;

/// How many runs are kept for overlay comparison.
pub const HISTORY_CAPACITY: usize = 2;

/// The most recent runs, oldest first.
///
/// Owned by whoever drives the runs; the integrator never sees it.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    runs: VecDeque<Trajectory>,
}

impl RunHistory {
    pub fn new() -> Self {
        RunHistory {
            runs: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Appends a run, returning the evicted oldest one when full.
    pub fn push(&mut self, trajectory: Trajectory) -> Option<Trajectory> {
        let evicted = if self.runs.len() == HISTORY_CAPACITY {
            self.runs.pop_front()
        } else {
            None
        };
        self.runs.push_back(trajectory);
        evicted
    }

    pub fn latest(&self) -> Option<&Trajectory> {
        self.runs.back()
    }

    /// Runs before the latest one, oldest first.
    pub fn previous(&self) -> impl Iterator<Item = &Trajectory> {
        self.runs.iter().take(self.runs.len().saturating_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.runs.iter()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ReactionConditions;
    use crate::integrator::integrate;

    fn run(temperature: f64) -> Trajectory {
        let conditions = ReactionConditions::with_default_flow(0.02, 1.0, temperature).unwrap();
        integrate(&conditions, 0.01).unwrap()
    }

    #[test]
    fn test_third_run_evicts_oldest() {
        let mut history = RunHistory::new();
        assert!(history.push(run(60.0)).is_none());
        assert!(history.push(run(70.0)).is_none());

        let evicted = history.push(run(80.0)).unwrap();
        assert_eq!(evicted.conditions().temperature_celsius(), 60.0);

        let kept: Vec<f64> = history
            .iter()
            .map(|t| t.conditions().temperature_celsius())
            .collect();
        assert_eq!(kept, vec![70.0, 80.0]);
        assert_eq!(history.latest().unwrap().conditions().temperature_celsius(), 80.0);
    }

    #[test]
    fn test_previous_excludes_latest() {
        let mut history = RunHistory::new();
        assert_eq!(history.previous().count(), 0);

        history.push(run(60.0));
        assert_eq!(history.previous().count(), 0);

        history.push(run(70.0));
        let previous: Vec<_> = history.previous().collect();
        assert_eq!(previous.len(), 1);
        assert_eq!(previous[0].conditions().temperature_celsius(), 60.0);
    }
}
