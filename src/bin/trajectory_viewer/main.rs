use clap::Parser;
use macroquad::prelude::Conf;

mod app;
mod constants;
mod render;
mod state;

/// Interactive view of a drag-affected trajectory
#[derive(Parser, Clone, Copy)]
#[command(name = "trajectory_viewer")]
pub(crate) struct ViewerArgs {
    /// Initial speed (m/s)
    #[arg(short = 'v', long, default_value_t = 30.0)]
    pub(crate) speed: f64,

    /// Launch angle (degrees)
    #[arg(short = 'a', long, default_value_t = 45.0)]
    pub(crate) angle: f64,

    /// Mass (kg)
    #[arg(short = 'm', long, default_value_t = 0.1)]
    pub(crate) mass: f64,

    /// Cross-sectional area (m^2)
    #[arg(short = 'A', long, default_value_t = 0.005)]
    pub(crate) area: f64,

    /// Drag coefficient
    #[arg(long, default_value_t = 0.5)]
    pub(crate) cd: f64,
}

fn window_conf() -> Conf {
    app::window_conf()
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    app::run(ViewerArgs::parse()).await;
}
