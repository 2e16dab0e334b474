use crate::core::error::DivergenceCause;
use crate::core::params::PhysicalParameters;

/// Position and velocity of the point mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl ProjectileState {
    pub fn at_origin(vx: f64, vy: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx,
            vy,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// `0.5 * Cd * rho * A * v^2`
pub fn drag_force(params: &PhysicalParameters, speed_mps: f64) -> f64 {
    params.drag_factor() * speed_mps * speed_mps
}

/// Acceleration `(ax, ay)` for the given velocity.
///
/// The drag direction is `-v / |v|`, which is undefined at rest. With
/// `zero_speed_has_no_drag` unset that case is reported as
/// [`DivergenceCause::ZeroSpeed`]; otherwise only gravity acts.
pub fn acceleration(
    params: &PhysicalParameters,
    vx: f64,
    vy: f64,
    zero_speed_has_no_drag: bool,
) -> Result<(f64, f64), DivergenceCause> {
    let v = vx.hypot(vy);
    if v == 0.0 {
        if zero_speed_has_no_drag {
            return Ok((0.0, -params.gravity_mps2));
        }
        return Err(DivergenceCause::ZeroSpeed);
    }

    let fd = drag_force(params, v);
    let ax = -fd * vx / (params.mass_kg * v);
    let ay = -params.gravity_mps2 - fd * vy / (params.mass_kg * v);
    if !ax.is_finite() || !ay.is_finite() {
        return Err(DivergenceCause::NonFiniteState);
    }
    Ok((ax, ay))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    #[test]
    fn state_speed_is_velocity_magnitude() {
        let state = ProjectileState::at_origin(3.0, -4.0);
        assert_close(state.speed(), 5.0, 1e-12);
        assert!(state.is_finite());
    }

    #[test]
    fn drag_opposes_velocity() {
        let params = PhysicalParameters::new(0.1, 0.005);
        let (ax, ay) = acceleration(&params, 20.0, 0.0, false).unwrap();

        let fd = 0.5 * 0.5 * 1.225 * 0.005 * 400.0;
        assert_close(ax, -fd / 0.1, 1e-12);
        assert_close(ay, -9.81, 1e-12);
    }

    #[test]
    fn drag_on_falling_body_points_up() {
        let params = PhysicalParameters::new(1.0, 0.01);
        let (ax, ay) = acceleration(&params, 0.0, -10.0, false).unwrap();
        assert_close(ax, 0.0, 1e-12);
        assert!(ay > -9.81);
    }

    #[test]
    fn no_drag_leaves_gravity_only() {
        let params = PhysicalParameters::new(1.0, 0.01).with_drag_coefficient(0.0);
        let (ax, ay) = acceleration(&params, 3.0, 4.0, false).unwrap();
        assert_close(ax, 0.0, 1e-15);
        assert_close(ay, -9.81, 1e-15);
    }

    #[test]
    fn zero_speed_diverges_unless_guarded() {
        let params = PhysicalParameters::new(1.0, 0.01);
        assert_eq!(
            acceleration(&params, 0.0, 0.0, false),
            Err(DivergenceCause::ZeroSpeed)
        );
        assert_eq!(acceleration(&params, 0.0, 0.0, true), Ok((0.0, -9.81)));
    }

    #[test]
    fn zero_mass_is_not_finite() {
        let params = PhysicalParameters::new(0.0, 0.01);
        assert_eq!(
            acceleration(&params, 1.0, 1.0, false),
            Err(DivergenceCause::NonFiniteState)
        );
    }
}
