pub mod ballistics;
pub mod drag;
pub mod error;
pub mod export;
pub mod integrator;
pub mod params;
pub mod plot;
pub mod trajectory;
pub mod window;
