use drag_ballistics::core::ballistics::{flight_time_and_range, sample_trajectory};
use drag_ballistics::{
    IntegrationMethod, IntegrationOptions, LaunchInputs, PhysicalParameters, Trajectory,
    simulate_with,
};

use crate::ViewerArgs;
use crate::constants::{
    MAX_ANGLE_DEG, MAX_DRAG_COEFFICIENT, MAX_SPEED_MPS, MIN_ANGLE_DEG, VACUUM_SAMPLES,
};

pub(crate) struct ViewerState {
    pub(crate) launch: LaunchInputs,
    pub(crate) physics: PhysicalParameters,
    pub(crate) method: IntegrationMethod,
    pub(crate) trajectory: Option<Trajectory>,
    pub(crate) vacuum: Vec<(f64, f64)>,
    pub(crate) last_error: Option<String>,
    pub(crate) show_vacuum: bool,
    pub(crate) playing: bool,
    /// Fractional sample index of the animated projectile.
    pub(crate) playhead: f64,
    initial: ViewerArgs,
}

impl ViewerState {
    pub(crate) fn new(args: ViewerArgs) -> Self {
        let mut state = Self {
            launch: LaunchInputs::new(args.speed, args.angle),
            physics: PhysicalParameters::new(args.mass, args.area).with_drag_coefficient(args.cd),
            method: IntegrationMethod::ForwardEuler,
            trajectory: None,
            vacuum: Vec::new(),
            last_error: None,
            show_vacuum: true,
            playing: true,
            playhead: 0.0,
            initial: args,
        };
        state.recompute();
        state
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.initial);
    }

    pub(crate) fn recompute(&mut self) {
        let options = IntegrationOptions::default().with_method(self.method);
        let outcome = self
            .physics
            .validate()
            .and_then(|_| simulate_with(self.launch, &self.physics, &options));

        match outcome {
            Ok(trajectory) => {
                self.trajectory = Some(trajectory);
                self.last_error = None;
            }
            Err(err) => {
                tracing::warn!(%err, "trajectory unavailable");
                self.trajectory = None;
                self.last_error = Some(err.to_string());
            }
        }

        self.vacuum = match flight_time_and_range(self.launch, self.physics.gravity_mps2) {
            Ok((time, _)) => {
                sample_trajectory(self.launch, self.physics.gravity_mps2, time, VACUUM_SAMPLES)
            }
            Err(_) => Vec::new(),
        };
        self.playhead = 0.0;
    }

    pub(crate) fn adjust(&mut self, d_angle: f64, d_speed: f64, d_cd: f64) {
        if d_angle == 0.0 && d_speed == 0.0 && d_cd == 0.0 {
            return;
        }
        self.launch.angle_deg = (self.launch.angle_deg + d_angle).clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG);
        self.launch.speed_mps = (self.launch.speed_mps + d_speed).clamp(0.0, MAX_SPEED_MPS);
        self.physics.drag_coefficient =
            (self.physics.drag_coefficient + d_cd).clamp(0.0, MAX_DRAG_COEFFICIENT);
        self.recompute();
    }

    pub(crate) fn toggle_method(&mut self) {
        self.method = match self.method {
            IntegrationMethod::ForwardEuler => IntegrationMethod::RungeKutta4,
            IntegrationMethod::RungeKutta4 => IntegrationMethod::ForwardEuler,
        };
        self.recompute();
    }

    /// Advances the projectile in real time; stops on the last sample.
    pub(crate) fn advance(&mut self, frame_dt: f64) {
        let Some(trajectory) = &self.trajectory else {
            return;
        };
        if !self.playing {
            return;
        }
        let last = trajectory.len().saturating_sub(1) as f64;
        self.playhead = (self.playhead + frame_dt / trajectory.time_step_s()).min(last);
    }

    pub(crate) fn projectile_position(&self) -> Option<(f64, f64)> {
        let trajectory = self.trajectory.as_ref()?;
        trajectory.points().get(self.playhead.floor() as usize).copied()
    }

    pub(crate) fn visible_points(&self) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .trajectory
            .as_ref()
            .map(|t| t.points().to_vec())
            .unwrap_or_default();
        if self.show_vacuum {
            points.extend_from_slice(&self.vacuum);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ViewerArgs {
        ViewerArgs {
            speed: 30.0,
            angle: 45.0,
            mass: 0.1,
            area: 0.005,
            cd: 0.5,
        }
    }

    #[test]
    fn starts_with_a_trajectory_and_vacuum_reference() {
        let state = ViewerState::new(args());
        assert!(state.trajectory.is_some());
        assert!(state.last_error.is_none());
        assert_eq!(state.vacuum.len(), VACUUM_SAMPLES + 1);
        assert_eq!(state.projectile_position(), Some((0.0, 0.0)));
    }

    #[test]
    fn zero_speed_shows_error_instead_of_panicking() {
        let mut state = ViewerState::new(args());
        state.adjust(0.0, -1_000.0, 0.0);
        assert_eq!(state.launch.speed_mps, 0.0);
        assert!(state.trajectory.is_none());
        assert!(state.last_error.as_deref().unwrap().contains("Numeric divergence"));
    }

    #[test]
    fn adjust_clamps_angle_and_recomputes() {
        let mut state = ViewerState::new(args());
        let before = state.trajectory.as_ref().unwrap().range_m();
        state.adjust(1_000.0, 0.0, 0.0);
        assert_eq!(state.launch.angle_deg, MAX_ANGLE_DEG);
        let after = state.trajectory.as_ref().unwrap().range_m();
        assert!(after < before);
    }

    #[test]
    fn playhead_stops_on_final_sample() {
        let mut state = ViewerState::new(args());
        state.advance(1_000.0);
        let last = state.trajectory.as_ref().unwrap().last();
        assert_eq!(state.projectile_position(), last);
    }

    #[test]
    fn toggling_method_recomputes() {
        let mut state = ViewerState::new(args());
        state.toggle_method();
        assert_eq!(
            state.trajectory.as_ref().unwrap().method(),
            IntegrationMethod::RungeKutta4
        );
    }
}
