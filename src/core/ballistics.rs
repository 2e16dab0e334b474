use serde::{Deserialize, Serialize};

use crate::core::error::{BallisticsError, BallisticsResult};

pub const EARTH_GRAVITY_MPS2: f64 = 9.81;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LaunchInputs {
    pub speed_mps: f64,
    pub angle_deg: f64,
}

impl LaunchInputs {
    pub fn new(speed_mps: f64, angle_deg: f64) -> Self {
        Self {
            speed_mps,
            angle_deg,
        }
    }

    /// Rejects non-finite values and negative speed. Zero speed is allowed
    /// through so the integrator can report it as a divergence.
    pub fn validate(&self) -> BallisticsResult<()> {
        if !self.speed_mps.is_finite() || self.speed_mps < 0.0 {
            return Err(BallisticsError::InvalidParameter {
                name: "speed",
                value: self.speed_mps,
                expected: "a finite value >= 0 m/s",
            });
        }
        if !self.angle_deg.is_finite() {
            return Err(BallisticsError::InvalidParameter {
                name: "angle",
                value: self.angle_deg,
                expected: "a finite angle in degrees",
            });
        }
        Ok(())
    }
}

pub fn velocity_components(inputs: LaunchInputs) -> (f64, f64) {
    let theta = inputs.angle_deg.to_radians();
    let vx = inputs.speed_mps * theta.cos();
    let vy = inputs.speed_mps * theta.sin();
    (vx, vy)
}

pub fn position_at_time(inputs: LaunchInputs, gravity_mps2: f64, time_s: f64) -> (f64, f64) {
    let (vx, vy) = velocity_components(inputs);
    let x = vx * time_s;
    let y = (vy * time_s) - (0.5 * gravity_mps2 * time_s * time_s);
    (x, y)
}

/// Landing time and range of a drag-free launch from ground level.
pub fn flight_time_and_range(inputs: LaunchInputs, gravity_mps2: f64) -> BallisticsResult<(f64, f64)> {
    inputs.validate()?;
    if !gravity_mps2.is_finite() || gravity_mps2 <= 0.0 {
        return Err(BallisticsError::InvalidParameter {
            name: "gravity",
            value: gravity_mps2,
            expected: "a finite value > 0 m/s^2",
        });
    }

    let (_, vy) = velocity_components(inputs);
    let t_land = (2.0 * vy / gravity_mps2).max(0.0);
    let (range, _) = position_at_time(inputs, gravity_mps2, t_land);
    Ok((t_land, range))
}

/// `v0^2 * sin(2 theta) / g`
pub fn analytic_range(inputs: LaunchInputs, gravity_mps2: f64) -> f64 {
    let theta = inputs.angle_deg.to_radians();
    inputs.speed_mps * inputs.speed_mps * (2.0 * theta).sin() / gravity_mps2
}

pub fn sample_trajectory(
    inputs: LaunchInputs,
    gravity_mps2: f64,
    time_of_flight_s: f64,
    samples: usize,
) -> Vec<(f64, f64)> {
    let sample_count = samples.max(2);
    (0..=sample_count)
        .map(|i| {
            let t = (i as f64 * time_of_flight_s) / sample_count as f64;
            position_at_time(inputs, gravity_mps2, t)
        })
        .collect()
}
