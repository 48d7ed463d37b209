use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use camber_core::{
    Cascade, ConfigurationError, DynamicalSystem, Gain, PdController, PdGains, PortVector,
    StateSelection,
};
use camber_multibody::RigidBodyPlant;

use crate::config::VehicleConfig;
use crate::driving::DrivingCommand;

/// A drivable vehicle: the reference gain cascaded into a PD-wrapped
/// plant. Its input port is a [`DrivingCommand`], its output the plant
/// state.
pub type VehicleSystem = Cascade<Gain, PdController<Arc<RigidBodyPlant>>>;

/// Wires a plant's actuators into a closed-loop vehicle system.
///
/// The steering actuator tracks the commanded steering angle by position;
/// each wheel actuator tracks `(throttle − brake) · throttle_speed` by
/// velocity. The plant is shared, so callers can keep reading it (for the
/// initial state, the tree, contact parameters) after composition.
///
/// # Errors
///
/// Fails fast with a [`ConfigurationError`] when a configured actuator is
/// missing from the plant, the plant carries an actuator the config does
/// not cover, or the port contract breaks — always before any stepping.
pub fn build_vehicle_system(
    plant: Arc<RigidBodyPlant>,
    config: &VehicleConfig,
) -> Result<VehicleSystem, ConfigurationError> {
    let actuators = plant.num_inputs();
    let positions = plant.num_positions();

    let expected = 1 + config.wheel_actuators.len();
    if actuators != expected {
        return Err(ConfigurationError::InvalidOption {
            option: "wheel_actuators",
            message: format!(
                "the plant has {actuators} actuators but the config names {expected}"
            ),
        });
    }

    let mut kp = DVector::zeros(actuators);
    let mut kd = DVector::zeros(actuators);
    // Reference layout is [positions ++ velocities]; the command matrix
    // fills one row per reference entry from the 3-wide driving command.
    let mut command_map = DMatrix::zeros(2 * actuators, DrivingCommand::WIDTH);

    let steering = resolve(&plant, &config.steering_actuator)?;
    kp[steering] = config.steering_kp;
    kd[steering] = config.steering_kd;
    command_map[(steering, 0)] = 1.0;

    for wheel in &config.wheel_actuators {
        let slot = resolve(&plant, wheel)?;
        kd[slot] = config.wheel_kd;
        command_map[(actuators + slot, 1)] = config.throttle_speed;
        command_map[(actuators + slot, 2)] = -config.throttle_speed;
    }

    let mut position_indices = Vec::with_capacity(actuators);
    let mut velocity_indices = Vec::with_capacity(actuators);
    for name in plant.actuator_names() {
        let dof = plant
            .actuator_dof(name)
            .expect("registered actuators always resolve");
        position_indices.push(dof);
        velocity_indices.push(positions + dof);
    }

    debug!(actuators, "built vehicle reference map");

    let reference_gain = Gain::new(command_map)?.named("pd_reference");
    let controller = PdController::connect(
        plant,
        StateSelection {
            positions: position_indices,
            velocities: velocity_indices,
        },
        PdGains { kp, kd },
    )?;
    Cascade::connect(reference_gain, controller)
}

/// The state a composed vehicle system starts from: the plant's initial
/// state under the cascade's state layout (the gain stage is stateless).
pub fn initial_vehicle_state(vehicle: &VehicleSystem) -> PortVector {
    vehicle.initial_state()
}

fn resolve(plant: &RigidBodyPlant, actuator: &str) -> Result<usize, ConfigurationError> {
    plant
        .actuator_index(actuator)
        .ok_or_else(|| ConfigurationError::UnknownActuator(actuator.to_owned()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};

    use camber_multibody::{BodyIndex, Joint, RigidBody, RigidBodyTree};

    use super::*;

    /// A minimal steerable cart: one steering joint and two wheel joints.
    fn cart_plant() -> RigidBodyPlant {
        let mut tree = RigidBodyTree::new();
        let chassis = tree
            .add_body(
                BodyIndex::WORLD,
                RigidBody::new("chassis", 20.0, Matrix3::from_diagonal_element(1.0)),
                Joint::prismatic("chassis_slide", Vector3::x()),
            )
            .unwrap();
        tree.add_body(
            chassis,
            RigidBody::new("steering_column", 1.0, Matrix3::from_diagonal_element(0.2)),
            Joint::revolute("steering", Vector3::z()),
        )
        .unwrap();
        for (body, joint) in [
            ("left_wheel", "left_wheel_joint"),
            ("right_wheel", "right_wheel_joint"),
        ] {
            tree.add_body(
                chassis,
                RigidBody::new(body, 2.0, Matrix3::from_diagonal_element(0.1)),
                Joint::revolute(joint, Vector3::y()).with_damping(0.5),
            )
            .unwrap();
        }

        let mut plant = RigidBodyPlant::new(tree);
        plant.add_actuator("steering", "steering").unwrap();
        plant
            .add_actuator("left_wheel_joint", "left_wheel_joint")
            .unwrap();
        plant
            .add_actuator("right_wheel_joint", "right_wheel_joint")
            .unwrap();
        plant
    }

    #[test]
    fn vehicle_system_ports_follow_the_ends() {
        let plant = Arc::new(cart_plant());
        let vehicle = build_vehicle_system(Arc::clone(&plant), &VehicleConfig::default()).unwrap();

        assert_eq!(vehicle.num_inputs(), DrivingCommand::WIDTH);
        assert_eq!(vehicle.num_outputs(), plant.num_states());
        assert_eq!(vehicle.num_states(), plant.num_states());
        assert_eq!(initial_vehicle_state(&vehicle).len(), plant.num_states());
    }

    #[test]
    fn steering_command_becomes_a_position_reference() {
        let plant = Arc::new(cart_plant());
        let config = VehicleConfig::default();
        let vehicle = build_vehicle_system(Arc::clone(&plant), &config).unwrap();

        let command = DrivingCommand {
            steering_angle: 0.25,
            throttle: 0.0,
            brake: 0.0,
        };
        let state = initial_vehicle_state(&vehicle);
        let derivative = vehicle.derivative(0.0, &state, &command.port()).unwrap();

        // From rest, the steering acceleration is kp·error divided by the
        // column inertia about its axis.
        let steering_dof = plant.actuator_dof("steering").unwrap();
        let acceleration = derivative[plant.num_positions() + steering_dof];
        assert!(acceleration > 0.0, "steering accelerates toward the angle");
    }

    #[test]
    fn throttle_commands_a_wheel_speed() {
        let plant = Arc::new(cart_plant());
        let config = VehicleConfig::default();
        let vehicle = build_vehicle_system(Arc::clone(&plant), &config).unwrap();

        let command = DrivingCommand {
            steering_angle: 0.0,
            throttle: 1.0,
            brake: 0.0,
        };
        let state = initial_vehicle_state(&vehicle);
        let derivative = vehicle.derivative(0.0, &state, &command.port()).unwrap();

        for wheel in &config.wheel_actuators {
            let dof = plant.actuator_dof(wheel).unwrap();
            let acceleration = derivative[plant.num_positions() + dof];
            assert!(acceleration > 0.0, "{wheel} spins up under throttle");
        }

        // Full brake cancels full throttle.
        let braked = DrivingCommand {
            steering_angle: 0.0,
            throttle: 1.0,
            brake: 1.0,
        };
        let derivative = vehicle.derivative(0.0, &state, &braked.port()).unwrap();
        for wheel in &config.wheel_actuators {
            let dof = plant.actuator_dof(wheel).unwrap();
            assert_relative_eq!(derivative[plant.num_positions() + dof], 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn missing_actuators_fail_fast() {
        let mut tree = RigidBodyTree::new();
        tree.add_body(
            BodyIndex::WORLD,
            RigidBody::new("chassis", 1.0, Matrix3::identity()),
            Joint::prismatic("slide", Vector3::x()),
        )
        .unwrap();
        let mut plant = RigidBodyPlant::new(tree);
        plant.add_actuator("thruster", "slide").unwrap();

        let err = build_vehicle_system(Arc::new(plant), &VehicleConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidOption { .. }));
    }

    #[test]
    fn misnamed_actuators_are_unresolved() {
        let plant = cart_plant();
        let config = VehicleConfig {
            steering_actuator: "tiller".to_owned(),
            ..VehicleConfig::default()
        };
        let err = build_vehicle_system(Arc::new(plant), &config).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnknownActuator(actuator) if actuator == "tiller"
        ));
    }
}
