//! Fixed-step integration of a drag-affected launch until ground impact.
//!
//! Every run starts at the origin and stops on the first step whose altitude
//! is below zero. That final sample is kept as-is; [`Trajectory::ground_crossing`]
//! interpolates the impact point when a caller needs it.

use serde::{Deserialize, Serialize};

use crate::core::ballistics::{LaunchInputs, velocity_components};
use crate::core::drag::{ProjectileState, acceleration};
use crate::core::error::{BallisticsError, BallisticsResult, DivergenceCause};
use crate::core::params::PhysicalParameters;
use crate::core::trajectory::Trajectory;

/// Cap applied when gravity cannot bring the projectile back down.
pub const NO_LANDING_STEP_LIMIT: usize = 10_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    /// Velocity first, then position with the updated velocity.
    #[default]
    ForwardEuler,
    /// Classical fourth-order Runge-Kutta on `(x, y, vx, vy)`.
    RungeKutta4,
}

/// What to do when the velocity magnitude is exactly zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroSpeedPolicy {
    /// Fail with [`BallisticsError::NumericDivergence`].
    #[default]
    Diverge,
    /// Apply gravity only for that evaluation.
    NoDrag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationOptions {
    pub method: IntegrationMethod,
    pub zero_speed: ZeroSpeedPolicy,
    /// Explicit cap on integration steps. `None` only caps runs whose
    /// gravity is not positive.
    pub step_limit: Option<usize>,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::ForwardEuler,
            zero_speed: ZeroSpeedPolicy::Diverge,
            step_limit: None,
        }
    }
}

impl IntegrationOptions {
    pub fn with_method(mut self, method: IntegrationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_zero_speed(mut self, zero_speed: ZeroSpeedPolicy) -> Self {
        self.zero_speed = zero_speed;
        self
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = Some(step_limit);
        self
    }

    /// A positive gravity always lands the projectile, so those runs are
    /// uncapped unless a limit was set explicitly.
    pub fn effective_step_limit(&self, params: &PhysicalParameters) -> Option<usize> {
        self.step_limit.or_else(|| {
            let lands = params.gravity_mps2.is_finite() && params.gravity_mps2 > 0.0;
            (!lands).then_some(NO_LANDING_STEP_LIMIT)
        })
    }
}

/// Forward Euler with zero-speed divergence.
pub fn simulate(launch: LaunchInputs, params: &PhysicalParameters) -> BallisticsResult<Trajectory> {
    simulate_with(launch, params, &IntegrationOptions::default())
}

pub fn simulate_with(
    launch: LaunchInputs,
    params: &PhysicalParameters,
    options: &IntegrationOptions,
) -> BallisticsResult<Trajectory> {
    tracing::debug!(
        speed_mps = launch.speed_mps,
        angle_deg = launch.angle_deg,
        drag_coefficient = params.drag_coefficient,
        time_step_s = params.time_step_s,
        method = ?options.method,
        "integrating trajectory"
    );

    let (vx, vy) = velocity_components(launch);
    let mut state = ProjectileState::at_origin(vx, vy);
    let mut points = vec![(state.x, state.y)];
    let guard_zero_speed = options.zero_speed == ZeroSpeedPolicy::NoDrag;
    let dt = params.time_step_s;
    let step_limit = options.effective_step_limit(params);
    let mut step = 0usize;

    while state.y >= 0.0 {
        if step_limit.is_some_and(|limit| step >= limit) {
            tracing::warn!(steps = step, "step limit reached before ground impact");
            return Err(BallisticsError::StepLimitExceeded { steps: step });
        }
        step += 1;

        let next = match options.method {
            IntegrationMethod::ForwardEuler => euler_step(&state, params, dt, guard_zero_speed),
            IntegrationMethod::RungeKutta4 => rk4_step(&state, params, dt, guard_zero_speed),
        }
        .and_then(|next| {
            if next.is_finite() {
                Ok(next)
            } else {
                Err(DivergenceCause::NonFiniteState)
            }
        });

        state = match next {
            Ok(next) => next,
            Err(cause) => {
                tracing::warn!(step, %cause, "integration diverged");
                return Err(BallisticsError::NumericDivergence { step, cause });
            }
        };
        points.push((state.x, state.y));
    }

    let trajectory = Trajectory::new(points, dt, options.method);
    tracing::debug!(
        samples = trajectory.len(),
        range_m = trajectory.range_m(),
        flight_time_s = trajectory.flight_time_s(),
        "trajectory complete"
    );
    Ok(trajectory)
}

fn euler_step(
    state: &ProjectileState,
    params: &PhysicalParameters,
    dt: f64,
    guard_zero_speed: bool,
) -> Result<ProjectileState, DivergenceCause> {
    let (ax, ay) = acceleration(params, state.vx, state.vy, guard_zero_speed)?;
    let vx = state.vx + ax * dt;
    let vy = state.vy + ay * dt;
    Ok(ProjectileState {
        x: state.x + vx * dt,
        y: state.y + vy * dt,
        vx,
        vy,
    })
}

type Derivative = [f64; 4];

fn derivative(
    state: &ProjectileState,
    params: &PhysicalParameters,
    guard_zero_speed: bool,
) -> Result<Derivative, DivergenceCause> {
    let (ax, ay) = acceleration(params, state.vx, state.vy, guard_zero_speed)?;
    Ok([state.vx, state.vy, ax, ay])
}

fn offset(state: &ProjectileState, k: &Derivative, h: f64) -> ProjectileState {
    ProjectileState {
        x: state.x + h * k[0],
        y: state.y + h * k[1],
        vx: state.vx + h * k[2],
        vy: state.vy + h * k[3],
    }
}

fn rk4_step(
    state: &ProjectileState,
    params: &PhysicalParameters,
    dt: f64,
    guard_zero_speed: bool,
) -> Result<ProjectileState, DivergenceCause> {
    let k1 = derivative(state, params, guard_zero_speed)?;
    let k2 = derivative(&offset(state, &k1, 0.5 * dt), params, guard_zero_speed)?;
    let k3 = derivative(&offset(state, &k2, 0.5 * dt), params, guard_zero_speed)?;
    let k4 = derivative(&offset(state, &k3, dt), params, guard_zero_speed)?;

    let mut combined = [0.0; 4];
    for (i, slot) in combined.iter_mut().enumerate() {
        *slot = (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) / 6.0;
    }
    Ok(offset(state, &combined, dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ballistics::{EARTH_GRAVITY_MPS2, analytic_range};

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    fn reference_launch() -> LaunchInputs {
        LaunchInputs::new(30.0, 45.0)
    }

    fn reference_params() -> PhysicalParameters {
        PhysicalParameters::new(0.1, 0.005)
    }

    fn drag_free(time_step_s: f64) -> PhysicalParameters {
        PhysicalParameters::new(1.0, 0.01)
            .with_drag_coefficient(0.0)
            .with_time_step(time_step_s)
    }

    #[test]
    fn reference_scenario_lands_short_of_vacuum_range() {
        let trajectory = simulate(reference_launch(), &reference_params())
            .expect("reference scenario should integrate");

        assert!(trajectory.len() > 1);
        assert_eq!(trajectory.first(), Some((0.0, 0.0)));
        let (_, y_last) = trajectory.last().unwrap();
        assert!(y_last < 0.0);
        assert!(trajectory.range_m() < 91.7);
        assert!(trajectory.range_m() > 0.0);
    }

    #[test]
    fn only_the_final_sample_is_below_ground() {
        let trajectory = simulate(reference_launch(), &reference_params()).unwrap();
        let ys = trajectory.ys();
        let (last, rest) = ys.split_last().unwrap();
        assert!(*last < 0.0);
        assert!(rest.iter().all(|&y| y >= 0.0));
    }

    #[test]
    fn first_step_follows_the_update_order() {
        let params = drag_free(0.1);
        let trajectory = simulate(LaunchInputs::new(10.0, 90.0), &params).unwrap();
        let (x1, y1) = trajectory.points()[1];

        let vy1 = 10.0 - EARTH_GRAVITY_MPS2 * 0.1;
        assert_close(y1, vy1 * 0.1, 1e-12);
        assert_close(x1, 10.0 * 90f64.to_radians().cos() * 0.1, 1e-12);
    }

    #[test]
    fn drag_free_run_matches_closed_form_range() {
        let launch = reference_launch();
        let expected = analytic_range(launch, EARTH_GRAVITY_MPS2);
        let trajectory = simulate(launch, &drag_free(0.001)).unwrap();
        assert_close(trajectory.range_m(), expected, 0.05);
    }

    #[test]
    fn smaller_steps_reduce_drag_free_error() {
        let launch = reference_launch();
        let expected = analytic_range(launch, EARTH_GRAVITY_MPS2);

        let errors: Vec<f64> = [0.01, 0.001, 0.0001]
            .iter()
            .map(|&dt| {
                let trajectory = simulate(launch, &drag_free(dt)).unwrap();
                (trajectory.range_m() - expected).abs()
            })
            .collect();

        assert!(errors[0] > errors[1], "errors={errors:?}");
        assert!(errors[1] > errors[2], "errors={errors:?}");
    }

    #[test]
    fn more_drag_means_shorter_range() {
        let launch = reference_launch();
        let ranges: Vec<f64> = [0.0, 0.25, 0.5, 1.0]
            .iter()
            .map(|&cd| {
                let params = reference_params().with_drag_coefficient(cd);
                simulate(launch, &params).unwrap().range_m()
            })
            .collect();

        for pair in ranges.windows(2) {
            assert!(pair[0] > pair[1], "ranges={ranges:?}");
        }
    }

    #[test]
    fn zero_speed_is_a_numeric_divergence() {
        let err = simulate(LaunchInputs::new(0.0, 45.0), &reference_params())
            .expect_err("zero speed must not produce a trajectory");

        match err {
            BallisticsError::NumericDivergence { step, cause } => {
                assert_eq!(step, 1);
                assert_eq!(cause, DivergenceCause::ZeroSpeed);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn no_drag_policy_drops_straight_down_from_rest() {
        let options = IntegrationOptions::default().with_zero_speed(ZeroSpeedPolicy::NoDrag);
        let trajectory = simulate_with(LaunchInputs::new(0.0, 45.0), &reference_params(), &options)
            .expect("guarded run should succeed");

        assert_eq!(trajectory.len(), 2);
        let (x, y) = trajectory.last().unwrap();
        assert_eq!(x, 0.0);
        assert!(y < 0.0);
    }

    #[test]
    fn zero_mass_diverges_instead_of_returning_nan() {
        let params = PhysicalParameters::new(0.0, 0.005);
        let err = simulate(reference_launch(), &params).expect_err("zero mass must fail");
        assert!(err.is_divergence());
    }

    #[test]
    fn rk4_keeps_termination_rule_and_is_more_accurate_mid_flight() {
        let launch = reference_launch();
        let params = drag_free(0.01);
        let options = IntegrationOptions::default().with_method(IntegrationMethod::RungeKutta4);
        let rk4 = simulate_with(launch, &params, &options).unwrap();
        let euler = simulate(launch, &params).unwrap();

        assert_eq!(rk4.method(), IntegrationMethod::RungeKutta4);
        assert_eq!(rk4.first(), Some((0.0, 0.0)));
        assert!(rk4.last().unwrap().1 < 0.0);

        // Constant acceleration: RK4 is exact at every sample.
        let step = 100;
        let t = step as f64 * 0.01;
        let exact_y = crate::core::ballistics::position_at_time(launch, EARTH_GRAVITY_MPS2, t).1;
        let rk4_err = (rk4.points()[step].1 - exact_y).abs();
        let euler_err = (euler.points()[step].1 - exact_y).abs();
        assert!(rk4_err < 1e-9);
        assert!(euler_err > rk4_err);
    }

    #[test]
    fn rk4_with_drag_lands_short_of_vacuum_range() {
        let options = IntegrationOptions::default().with_method(IntegrationMethod::RungeKutta4);
        let trajectory = simulate_with(reference_launch(), &reference_params(), &options).unwrap();
        let euler = simulate(reference_launch(), &reference_params()).unwrap();

        assert!(trajectory.range_m() < 91.7);
        assert_close(trajectory.range_m(), euler.range_m(), 2.0);
    }

    #[test]
    fn step_limit_stops_runs_that_never_land() {
        let params = reference_params().with_gravity(-1.0);
        let options = IntegrationOptions::default().with_step_limit(1_000);
        let err = simulate_with(reference_launch(), &params, &options).expect_err("never lands");
        assert!(matches!(err, BallisticsError::StepLimitExceeded { steps: 1_000 }));
    }

    #[test]
    fn positive_gravity_runs_are_never_capped_by_default() {
        let options = IntegrationOptions::default();
        assert_eq!(options.effective_step_limit(&reference_params()), None);
        assert_eq!(
            options.effective_step_limit(&reference_params().with_time_step(1e-7)),
            None
        );
        assert_eq!(
            options.effective_step_limit(&reference_params().with_gravity(0.0)),
            Some(NO_LANDING_STEP_LIMIT)
        );
        assert_eq!(
            options.effective_step_limit(&reference_params().with_gravity(-1.0)),
            Some(NO_LANDING_STEP_LIMIT)
        );
        assert_eq!(
            options
                .with_step_limit(50)
                .effective_step_limit(&reference_params()),
            Some(50)
        );
    }

    #[test]
    fn fast_fine_grained_drag_free_run_lands() {
        // 1000 m/s at 45 degrees stays aloft for about 144 s.
        let launch = LaunchInputs::new(1000.0, 45.0);
        let trajectory = simulate(launch, &drag_free(0.001)).expect("must land");

        assert!(trajectory.len() > 144_000);
        assert!(trajectory.last().unwrap().1 < 0.0);
        let expected = analytic_range(launch, EARTH_GRAVITY_MPS2);
        assert_close(trajectory.range_m(), expected, expected * 1e-3);
    }
}
