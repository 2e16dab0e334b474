pub mod core;

pub use crate::core::ballistics::LaunchInputs;
pub use crate::core::error::{BallisticsError, DivergenceCause};
pub use crate::core::integrator::{
    IntegrationMethod, IntegrationOptions, ZeroSpeedPolicy, simulate, simulate_with,
};
pub use crate::core::params::{PhysicalParameters, SimulationConfig};
pub use crate::core::trajectory::{Trajectory, TrajectorySummary};
