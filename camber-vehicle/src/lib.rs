//! The vehicle demo layer: everything needed to turn a rigid-body vehicle
//! model into a drivable, simulatable system.
//!
//! A vehicle is a [`RigidBodyPlant`] whose actuators are wrapped in a
//! [`PdController`](camber_core::PdController) and fronted by a reference
//! [`Gain`](camber_core::Gain) that maps a [`DrivingCommand`] onto the
//! controller's reference port. Command-line parsing and rendering live
//! outside this crate; scripted actors and the visualization pose adapter
//! are wired in as ordinary composition stages.

mod builder;
mod config;
mod driving;
mod scripted;
mod viz;

pub use builder::{VehicleSystem, build_vehicle_system, initial_vehicle_state};
pub use config::VehicleConfig;
pub use driving::DrivingCommand;
pub use scripted::scripted_car;
pub use viz::pose_adapter;

use camber_multibody::ContactParameters;
use camber_solvers::SimulationOptions;

/// Default options for vehicle runs: an initial step of 5e-3 and no stop
/// time.
pub fn default_simulation_options() -> SimulationOptions {
    SimulationOptions::default()
}

/// The penetration and friction parameters vehicle models are tuned for.
pub fn contact_defaults() -> ContactParameters {
    ContactParameters {
        stiffness: 5000.0,
        damping: 500.0,
        friction: 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_step_and_run_forever() {
        let options = default_simulation_options();
        assert_eq!(options.step_size, 5e-3);
        assert_eq!(options.stop_time, f64::INFINITY);
    }

    #[test]
    fn contact_defaults_match_the_tuned_parameters() {
        let contact = contact_defaults();
        assert_eq!(contact.stiffness, 5000.0);
        assert_eq!(contact.damping, 500.0);
        assert_eq!(contact.friction, 10.0);
    }
}
