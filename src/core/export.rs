use std::io::Write;

use serde::Serialize;

use crate::core::error::BallisticsResult;
use crate::core::trajectory::{Trajectory, TrajectorySummary};

#[derive(Serialize)]
struct TrajectoryDocument<'a> {
    summary: TrajectorySummary,
    x_m: &'a [f64],
    y_m: &'a [f64],
}

/// One `step,time_s,x_m,y_m` row per sample.
pub fn write_csv<W: Write>(trajectory: &Trajectory, out: W) -> BallisticsResult<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["step", "time_s", "x_m", "y_m"])?;
    let dt = trajectory.time_step_s();
    for (step, &(x, y)) in trajectory.points().iter().enumerate() {
        w.write_record(&[
            step.to_string(),
            format!("{:.6}", step as f64 * dt),
            format!("{x:.6}"),
            format!("{y:.6}"),
        ])?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(trajectory: &Trajectory, mut out: W) -> BallisticsResult<()> {
    let xs = trajectory.xs();
    let ys = trajectory.ys();
    let document = TrajectoryDocument {
        summary: trajectory.summary(),
        x_m: &xs,
        y_m: &ys,
    };
    serde_json::to_writer_pretty(&mut out, &document)?;
    writeln!(out)?;
    Ok(())
}
