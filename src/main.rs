use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use drag_ballistics::core::ballistics::{
    analytic_range, flight_time_and_range, sample_trajectory,
};
use drag_ballistics::core::export::{write_csv, write_json};
use drag_ballistics::core::plot::{DEFAULT_PLOT_SIZE, PlotSeries, render_png, timestamped_path};
use drag_ballistics::{
    IntegrationMethod, LaunchInputs, PhysicalParameters, SimulationConfig, Trajectory,
    ZeroSpeedPolicy, simulate_with,
};

#[derive(Parser)]
#[command(name = "drag_ballistics")]
#[command(version)]
#[command(about = "Point-mass trajectories under gravity and quadratic drag", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate one trajectory and print or export it
    Simulate {
        #[command(flatten)]
        setup: SetupArgs,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write a PNG plot; without a path a timestamped name is used
        #[arg(long, value_name = "PATH")]
        plot: Option<Option<PathBuf>>,

        /// Overlay the drag-free trajectory on the plot
        #[arg(long)]
        with_vacuum: bool,
    },

    /// Compare ranges across several drag coefficients
    Sweep {
        #[command(flatten)]
        setup: SetupArgs,

        /// Drag coefficients to try
        #[arg(long, value_delimiter = ',', default_value = "0,0.25,0.5,0.75,1")]
        cds: Vec<f64>,

        /// Write a PNG plot with one line per coefficient
        #[arg(long, value_name = "PATH")]
        plot: Option<PathBuf>,
    },

    /// Compare the drag run against the closed-form vacuum solution and RK4
    Compare {
        #[command(flatten)]
        setup: SetupArgs,
    },
}

#[derive(Args, Clone)]
struct SetupArgs {
    /// JSON file with launch, physics and options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial speed (m/s)
    #[arg(short = 'v', long)]
    speed: Option<f64>,

    /// Launch angle (degrees)
    #[arg(short = 'a', long)]
    angle: Option<f64>,

    /// Mass (kg)
    #[arg(short = 'm', long)]
    mass: Option<f64>,

    /// Cross-sectional area (m^2)
    #[arg(short = 'A', long)]
    area: Option<f64>,

    /// Drag coefficient [default: 0.5]
    #[arg(long)]
    cd: Option<f64>,

    /// Air density (kg/m^3) [default: 1.225]
    #[arg(long)]
    rho: Option<f64>,

    /// Gravitational acceleration (m/s^2) [default: 9.81]
    #[arg(short, long)]
    gravity: Option<f64>,

    /// Time step (s) [default: 0.01]
    #[arg(long)]
    dt: Option<f64>,

    /// Integration method
    #[arg(long, value_enum)]
    method: Option<MethodArg>,

    /// Behaviour when the velocity magnitude hits zero
    #[arg(long, value_enum)]
    zero_speed: Option<ZeroSpeedArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Euler,
    Rk4,
}

impl From<MethodArg> for IntegrationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Euler => IntegrationMethod::ForwardEuler,
            MethodArg::Rk4 => IntegrationMethod::RungeKutta4,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZeroSpeedArg {
    Diverge,
    NoDrag,
}

impl From<ZeroSpeedArg> for ZeroSpeedPolicy {
    fn from(arg: ZeroSpeedArg) -> Self {
        match arg {
            ZeroSpeedArg::Diverge => ZeroSpeedPolicy::Diverge,
            ZeroSpeedArg::NoDrag => ZeroSpeedPolicy::NoDrag,
        }
    }
}

impl SetupArgs {
    /// Merges the optional config file with command-line overrides.
    fn resolve(&self) -> Result<SimulationConfig> {
        let base = match &self.config {
            Some(path) => Some(
                SimulationConfig::from_json_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
            ),
            None => None,
        };

        let speed_mps = self
            .speed
            .or(base.map(|c| c.launch.speed_mps))
            .context("Missing --speed (or launch.speed_mps in --config)")?;
        let angle_deg = self
            .angle
            .or(base.map(|c| c.launch.angle_deg))
            .context("Missing --angle (or launch.angle_deg in --config)")?;
        let mass_kg = self
            .mass
            .or(base.map(|c| c.physics.mass_kg))
            .context("Missing --mass (or physics.mass_kg in --config)")?;
        let area_m2 = self
            .area
            .or(base.map(|c| c.physics.area_m2))
            .context("Missing --area (or physics.area_m2 in --config)")?;

        let mut physics = base
            .map(|c| c.physics)
            .unwrap_or_else(|| PhysicalParameters::new(mass_kg, area_m2));
        physics.mass_kg = mass_kg;
        physics.area_m2 = area_m2;
        if let Some(cd) = self.cd {
            physics = physics.with_drag_coefficient(cd);
        }
        if let Some(rho) = self.rho {
            physics = physics.with_air_density(rho);
        }
        if let Some(g) = self.gravity {
            physics = physics.with_gravity(g);
        }
        if let Some(dt) = self.dt {
            physics = physics.with_time_step(dt);
        }

        let mut options = base.map(|c| c.options).unwrap_or_default();
        if let Some(method) = self.method {
            options = options.with_method(method.into());
        }
        if let Some(zero_speed) = self.zero_speed {
            options = options.with_zero_speed(zero_speed.into());
        }

        let config = SimulationConfig {
            launch: LaunchInputs::new(speed_mps, angle_deg),
            physics,
            options,
        };
        config.validate().context("Invalid simulation parameters")?;
        Ok(config)
    }
}

fn integrate(config: &SimulationConfig) -> Result<Trajectory> {
    simulate_with(config.launch, &config.physics, &config.options).with_context(|| {
        format!(
            "Integration failed for v0={} m/s, angle={} deg",
            config.launch.speed_mps, config.launch.angle_deg
        )
    })
}

fn vacuum_points(config: &SimulationConfig) -> Result<Vec<(f64, f64)>> {
    let g = config.physics.gravity_mps2;
    let (time, _) = flight_time_and_range(config.launch, g)?;
    Ok(sample_trajectory(config.launch, g, time, 200))
}

fn print_table(config: &SimulationConfig, trajectory: &Trajectory) {
    let summary = trajectory.summary();
    println!("╔════════════════════════════════════════╗");
    println!("║         TRAJECTORY RESULTS             ║");
    println!("╠════════════════════════════════════════╣");
    println!("║ Speed:             {:>8.2} m/s        ║", config.launch.speed_mps);
    println!("║ Angle:             {:>8.2} deg        ║", config.launch.angle_deg);
    println!("║ Drag coefficient:  {:>8.3}            ║", config.physics.drag_coefficient);
    println!("║ Range:             {:>8.2} m          ║", summary.range_m);
    println!("║ Apex height:       {:>8.2} m          ║", summary.apex_y_m);
    println!("║ Time of flight:    {:>8.3} s          ║", summary.flight_time_s);
    println!("║ Samples:           {:>8}            ║", summary.samples);
    println!("╚════════════════════════════════════════╝");

    println!("\nTrajectory points (every {:.2}s):", summary.flight_time_s / 10.0);
    println!("┌──────────┬──────────┬──────────┐");
    println!("│ Time (s) │  X (m)   │  Y (m)   │");
    println!("├──────────┼──────────┼──────────┤");
    let points = trajectory.points();
    let every = (points.len() / 10).max(1);
    for (i, &(x, y)) in points.iter().enumerate() {
        if i % every == 0 || i == points.len() - 1 {
            let t = i as f64 * trajectory.time_step_s();
            println!("│ {t:>8.3} │ {x:>8.2} │ {y:>8.2} │");
        }
    }
    println!("└──────────┴──────────┴──────────┘");
}

fn plot_path(requested: Option<PathBuf>) -> PathBuf {
    requested.unwrap_or_else(|| timestamped_path(Path::new("."), &chrono::Local::now()))
}

fn run_simulate(
    setup: &SetupArgs,
    format: OutputFormat,
    plot: Option<Option<PathBuf>>,
    with_vacuum: bool,
) -> Result<()> {
    let config = setup.resolve()?;
    let trajectory = integrate(&config)?;

    match format {
        OutputFormat::Table => print_table(&config, &trajectory),
        OutputFormat::Json => write_json(&trajectory, io::stdout().lock())?,
        OutputFormat::Csv => write_csv(&trajectory, io::stdout().lock())?,
    }

    if let Some(requested) = plot {
        let path = plot_path(requested);
        let vacuum = if with_vacuum {
            Some(vacuum_points(&config)?)
        } else {
            None
        };
        let mut series = vec![PlotSeries::solid(
            format!("Cd = {}", config.physics.drag_coefficient),
            trajectory.points(),
        )];
        if let Some(vacuum) = &vacuum {
            series.push(PlotSeries::reference("No drag", vacuum));
        }
        render_png(
            &path,
            "Ballistic trajectory with air resistance",
            &series,
            DEFAULT_PLOT_SIZE,
        )
        .with_context(|| format!("Failed to write plot {}", path.display()))?;
        eprintln!("Plot written to {}", path.display());
    }

    Ok(())
}

fn run_sweep(setup: &SetupArgs, cds: &[f64], plot: Option<PathBuf>) -> Result<()> {
    let base = setup.resolve()?;
    let mut runs = Vec::with_capacity(cds.len());

    println!("┌──────────┬──────────┬──────────┬──────────┐");
    println!("│    Cd    │ Range(m) │ Apex (m) │ Time (s) │");
    println!("├──────────┼──────────┼──────────┼──────────┤");
    for &cd in cds {
        let mut config = base;
        config.physics = config.physics.with_drag_coefficient(cd);
        config.validate().context("Invalid drag coefficient in sweep")?;
        let trajectory = integrate(&config)?;
        let apex = trajectory.apex().map_or(0.0, |(_, y)| y);
        println!(
            "│ {cd:>8.3} │ {:>8.2} │ {apex:>8.2} │ {:>8.3} │",
            trajectory.range_m(),
            trajectory.flight_time_s()
        );
        runs.push((cd, trajectory));
    }
    println!("└──────────┴──────────┴──────────┴──────────┘");

    if let Some(path) = plot {
        let series: Vec<PlotSeries<'_>> = runs
            .iter()
            .map(|(cd, t)| PlotSeries::solid(format!("Cd = {cd}"), t.points()))
            .collect();
        render_png(&path, "Drag coefficient sweep", &series, DEFAULT_PLOT_SIZE)
            .with_context(|| format!("Failed to write plot {}", path.display()))?;
        eprintln!("Plot written to {}", path.display());
    }
    Ok(())
}

fn run_compare(setup: &SetupArgs) -> Result<()> {
    let config = setup.resolve()?;
    let g = config.physics.gravity_mps2;

    let euler_config = SimulationConfig {
        options: config.options.with_method(IntegrationMethod::ForwardEuler),
        ..config
    };
    let rk4_config = SimulationConfig {
        options: config.options.with_method(IntegrationMethod::RungeKutta4),
        ..config
    };
    let euler = integrate(&euler_config)?;
    let rk4 = integrate(&rk4_config)?;
    let vacuum_range = analytic_range(config.launch, g);
    let (vacuum_time, _) = flight_time_and_range(config.launch, g)?;

    println!("Drag-free range:        {vacuum_range:>10.3} m  ({vacuum_time:.3} s)");
    println!(
        "Forward Euler range:    {:>10.3} m  ({:.3} s, {} samples)",
        euler.range_m(),
        euler.flight_time_s(),
        euler.len()
    );
    println!(
        "Runge-Kutta 4 range:    {:>10.3} m  ({:.3} s, {} samples)",
        rk4.range_m(),
        rk4.flight_time_s(),
        rk4.len()
    );
    if let (Some(e), Some(r)) = (euler.ground_crossing(), rk4.ground_crossing()) {
        println!("Interpolated impact:    {e:>10.3} m (Euler), {r:.3} m (RK4)");
    }
    match range_loss_percent(euler.range_m(), vacuum_range) {
        Some(loss) => println!("Range lost to drag:     {loss:>10.1} %"),
        None => println!("Range lost to drag:     {:>10} %", "n/a"),
    }
    Ok(())
}

/// `None` when the drag-free range is too short to compare against.
fn range_loss_percent(drag_range: f64, vacuum_range: f64) -> Option<f64> {
    (vacuum_range.abs() > 1e-6).then(|| 100.0 * (1.0 - drag_range / vacuum_range))
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            setup,
            format,
            plot,
            with_vacuum,
        } => run_simulate(&setup, format, plot, with_vacuum),
        Commands::Sweep { setup, cds, plot } => run_sweep(&setup, &cds, plot),
        Commands::Compare { setup } => run_compare(&setup),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
