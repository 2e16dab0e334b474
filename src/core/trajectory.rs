use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::integrator::IntegrationMethod;

/// Ordered `(x, y)` samples in metres, one per integration step.
///
/// The first sample is the launch point `(0, 0)` and the last is the first
/// sample that went below ground. Samples are never interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    points: Vec<(f64, f64)>,
    time_step_s: f64,
    method: IntegrationMethod,
}

/// Scalar description of a finished run.
#[derive(Clone, Debug, Serialize)]
pub struct TrajectorySummary {
    pub method: IntegrationMethod,
    pub samples: usize,
    pub time_step_s: f64,
    pub flight_time_s: f64,
    pub range_m: f64,
    pub apex_x_m: f64,
    pub apex_y_m: f64,
    pub impact_x_m: f64,
    pub impact_y_m: f64,
    pub ground_crossing_m: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

impl Trajectory {
    pub(crate) fn new(points: Vec<(f64, f64)>, time_step_s: f64, method: IntegrationMethod) -> Self {
        Self {
            points,
            time_step_s,
            method,
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|&(x, _)| x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }

    /// The two equal-length coordinate sequences a plotter consumes.
    pub fn into_columns(self) -> (Vec<f64>, Vec<f64>) {
        self.points.into_iter().unzip()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<(f64, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }

    pub fn time_step_s(&self) -> f64 {
        self.time_step_s
    }

    pub fn method(&self) -> IntegrationMethod {
        self.method
    }

    pub fn flight_time_s(&self) -> f64 {
        self.points.len().saturating_sub(1) as f64 * self.time_step_s
    }

    /// Largest horizontal distance reached.
    pub fn range_m(&self) -> f64 {
        self.points.iter().fold(0.0f64, |acc, &(x, _)| acc.max(x))
    }

    /// Highest sample.
    pub fn apex(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Where the segment between the last two samples crosses `y = 0`.
    ///
    /// Analysis helper only; the stored samples keep the below-ground point.
    pub fn ground_crossing(&self) -> Option<f64> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        let (x0, y0) = self.points[n - 2];
        let (x1, y1) = self.points[n - 1];
        if y0 < 0.0 || y1 >= 0.0 {
            return None;
        }
        let t = y0 / (y0 - y1);
        Some(x0 + t * (x1 - x0))
    }

    pub fn summary(&self) -> TrajectorySummary {
        let (apex_x_m, apex_y_m) = self.apex().unwrap_or((0.0, 0.0));
        let (impact_x_m, impact_y_m) = self.last().unwrap_or((0.0, 0.0));
        TrajectorySummary {
            method: self.method,
            samples: self.len(),
            time_step_s: self.time_step_s,
            flight_time_s: self.flight_time_s(),
            range_m: self.range_m(),
            apex_x_m,
            apex_y_m,
            impact_x_m,
            impact_y_m,
            ground_crossing_m: self.ground_crossing(),
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![(0.0, 0.0), (1.0, 2.0), (2.0, 3.0), (3.0, 1.0), (4.0, -1.0)],
            0.5,
            IntegrationMethod::ForwardEuler,
        )
    }

    #[test]
    fn columns_have_equal_length() {
        let (xs, ys) = sample().into_columns();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ys, vec![0.0, 2.0, 3.0, 1.0, -1.0]);
    }

    #[test]
    fn derived_quantities() {
        let trajectory = sample();
        assert_eq!(trajectory.len(), 5);
        assert_eq!(trajectory.first(), Some((0.0, 0.0)));
        assert_eq!(trajectory.last(), Some((4.0, -1.0)));
        assert_eq!(trajectory.range_m(), 4.0);
        assert_eq!(trajectory.apex(), Some((2.0, 3.0)));
        assert_eq!(trajectory.flight_time_s(), 2.0);
        assert_eq!(trajectory.ground_crossing(), Some(3.5));
    }

    #[test]
    fn summary_mirrors_accessors() {
        let summary = sample().summary();
        assert_eq!(summary.samples, 5);
        assert_eq!(summary.range_m, 4.0);
        assert_eq!(summary.apex_y_m, 3.0);
        assert_eq!(summary.impact_y_m, -1.0);
        assert_eq!(summary.ground_crossing_m, Some(3.5));
    }

    #[test]
    fn no_crossing_without_a_below_ground_sample() {
        let trajectory = Trajectory::new(
            vec![(0.0, 0.0), (1.0, 1.0)],
            0.1,
            IntegrationMethod::ForwardEuler,
        );
        assert_eq!(trajectory.ground_crossing(), None);
    }
}
