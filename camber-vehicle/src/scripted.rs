use nalgebra::{DVector, dvector};

use camber_core::{ConfigurationError, TrajectorySource};

/// Number of pre-programmed trajectories in the catalog.
const CATALOG_LEN: usize = 3;

/// A scripted car following one of the pre-programmed trajectories.
///
/// The returned source has zero state and zero input; its output is the
/// simple-car state `[x, y, heading, speed]` as a deterministic function
/// of time. The catalog is indexed 0..3:
///
/// 0. A straight run along world x at 8 m/s.
/// 1. A counterclockwise circle of radius 25 m at 6 m/s.
/// 2. A lane change at 10 m/s.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownTrajectory`] for an index outside
/// the catalog.
pub fn scripted_car(index: usize) -> Result<TrajectorySource, ConfigurationError> {
    let source = match index {
        0 => TrajectorySource::new(4, |time| dvector![8.0 * time, 0.0, 0.0, 8.0])?,
        1 => TrajectorySource::new(4, |time| circle(25.0, 6.0, time))?,
        2 => TrajectorySource::new(4, |time| lane_change(10.0, 3.5, time))?,
        _ => {
            return Err(ConfigurationError::UnknownTrajectory {
                index,
                catalog_len: CATALOG_LEN,
            });
        }
    };
    Ok(source.named("simple_car_state"))
}

fn circle(radius: f64, speed: f64, time: f64) -> DVector<f64> {
    let rate = speed / radius;
    let angle = rate * time;
    dvector![
        radius * angle.sin(),
        radius * (1.0 - angle.cos()),
        angle,
        speed
    ]
}

fn lane_change(speed: f64, offset: f64, time: f64) -> DVector<f64> {
    // A smooth sideways blend finishing after ten seconds.
    let progress = (time / 10.0).clamp(0.0, 1.0);
    let blend = 0.5 * (1.0 - (std::f64::consts::PI * progress).cos());
    let lateral_rate = if (0.0..1.0).contains(&progress) {
        offset * 0.5 * std::f64::consts::PI * (std::f64::consts::PI * progress).sin() / 10.0
    } else {
        0.0
    };
    let heading = lateral_rate.atan2(speed);
    dvector![
        speed * time,
        offset * blend,
        heading,
        speed.hypot(lateral_rate)
    ]
}
