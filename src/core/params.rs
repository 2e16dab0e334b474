use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::ballistics::{EARTH_GRAVITY_MPS2, LaunchInputs};
use crate::core::error::{BallisticsError, BallisticsResult};
use crate::core::integrator::IntegrationOptions;

pub const DEFAULT_DRAG_COEFFICIENT: f64 = 0.5;
pub const SEA_LEVEL_AIR_DENSITY_KG_M3: f64 = 1.225;
pub const DEFAULT_TIME_STEP_S: f64 = 0.01;

fn default_drag_coefficient() -> f64 {
    DEFAULT_DRAG_COEFFICIENT
}

fn default_air_density() -> f64 {
    SEA_LEVEL_AIR_DENSITY_KG_M3
}

fn default_gravity() -> f64 {
    EARTH_GRAVITY_MPS2
}

fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP_S
}

/// Mass and area have no sensible default, everything else does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    #[serde(default = "default_drag_coefficient")]
    pub drag_coefficient: f64,
    #[serde(default = "default_air_density")]
    pub air_density_kg_m3: f64,
    pub area_m2: f64,
    pub mass_kg: f64,
    #[serde(default = "default_gravity")]
    pub gravity_mps2: f64,
    #[serde(default = "default_time_step")]
    pub time_step_s: f64,
}

impl PhysicalParameters {
    pub fn new(mass_kg: f64, area_m2: f64) -> Self {
        Self {
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            air_density_kg_m3: SEA_LEVEL_AIR_DENSITY_KG_M3,
            area_m2,
            mass_kg,
            gravity_mps2: EARTH_GRAVITY_MPS2,
            time_step_s: DEFAULT_TIME_STEP_S,
        }
    }

    pub fn with_drag_coefficient(mut self, drag_coefficient: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    pub fn with_air_density(mut self, air_density_kg_m3: f64) -> Self {
        self.air_density_kg_m3 = air_density_kg_m3;
        self
    }

    pub fn with_gravity(mut self, gravity_mps2: f64) -> Self {
        self.gravity_mps2 = gravity_mps2;
        self
    }

    pub fn with_time_step(mut self, time_step_s: f64) -> Self {
        self.time_step_s = time_step_s;
        self
    }

    /// `0.5 * Cd * rho * A`, so that drag force is this times `v^2`.
    pub fn drag_factor(&self) -> f64 {
        0.5 * self.drag_coefficient * self.air_density_kg_m3 * self.area_m2
    }

    /// Caller-side checks. The integrator never calls this.
    pub fn validate(&self) -> BallisticsResult<()> {
        check(self.mass_kg, "mass", "a finite value > 0 kg", |v| v > 0.0)?;
        check(self.area_m2, "area", "a finite value >= 0 m^2", |v| v >= 0.0)?;
        check(
            self.drag_coefficient,
            "drag coefficient",
            "a finite value >= 0",
            |v| v >= 0.0,
        )?;
        check(
            self.air_density_kg_m3,
            "air density",
            "a finite value >= 0 kg/m^3",
            |v| v >= 0.0,
        )?;
        check(
            self.gravity_mps2,
            "gravity",
            "a finite value > 0 m/s^2",
            |v| v > 0.0,
        )?;
        check(
            self.time_step_s,
            "time step",
            "a finite value > 0 s",
            |v| v > 0.0,
        )?;
        Ok(())
    }
}

fn check(
    value: f64,
    name: &'static str,
    expected: &'static str,
    accept: impl Fn(f64) -> bool,
) -> BallisticsResult<()> {
    if value.is_finite() && accept(value) {
        Ok(())
    } else {
        Err(BallisticsError::InvalidParameter {
            name,
            value,
            expected,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub launch: LaunchInputs,
    pub physics: PhysicalParameters,
    #[serde(default)]
    pub options: IntegrationOptions,
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> BallisticsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> BallisticsResult<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), ?config, "loaded simulation config");
        Ok(config)
    }

    pub fn validate(&self) -> BallisticsResult<()> {
        self.launch.validate()?;
        self.physics.validate()
    }
}
