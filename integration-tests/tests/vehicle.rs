//! Building and driving the composed vehicle system.

use std::sync::Arc;

use approx::assert_relative_eq;

use camber_multibody::ModelInstanceIdTable;
use camber_solvers::{SimulationOptions, Simulator, Status};
use camber_vehicle::{
    DrivingCommand, VehicleConfig, build_vehicle_system, default_simulation_options,
    initial_vehicle_state,
};
use integration_tests::cart_plant;

#[test]
fn a_constant_command_steers_and_drives_the_cart() {
    let plant = Arc::new(cart_plant());
    let vehicle = build_vehicle_system(Arc::clone(&plant), &VehicleConfig::default()).unwrap();

    let command = DrivingCommand {
        steering_angle: 0.2,
        throttle: 0.5,
        brake: 0.0,
    };

    let options = SimulationOptions::default()
        .with_step_size(1e-3)
        .with_stop_time(0.5);
    let mut simulator = Simulator::new(options).unwrap();
    let solution = simulator
        .run_with_input(&vehicle, initial_vehicle_state(&vehicle), move |_| {
            command.port()
        })
        .unwrap();

    assert_eq!(solution.status, Status::Completed);
    assert!(solution.samples.iter().all(|sample| sample.state.is_finite()));

    let positions = plant.num_positions();
    let state = solution.final_state();

    let steering_dof = plant.actuator_dof("steering").unwrap();
    let steering_angle = state[steering_dof];
    assert!(
        steering_angle > 0.1 && steering_angle < 0.3,
        "steering angle settled at {steering_angle}"
    );

    // Half throttle targets half the full-throttle wheel speed.
    for wheel in ["left_wheel_joint", "right_wheel_joint"] {
        let dof = plant.actuator_dof(wheel).unwrap();
        let speed = state[positions + dof];
        assert!(speed > 5.0, "{wheel} only reached {speed} rad/s");
    }
}

#[test]
fn default_options_are_the_vehicle_defaults() {
    let options = default_simulation_options();
    assert_relative_eq!(options.step_size, 5e-3);
    assert!(options.stop_time.is_infinite());
}

#[test]
fn vehicle_config_round_trips_through_toml() {
    let config = VehicleConfig {
        steering_actuator: "steering".to_owned(),
        wheel_actuators: vec!["front_left".to_owned(), "front_right".to_owned()],
        steering_kp: 250.0,
        steering_kd: 40.0,
        wheel_kd: 75.0,
        throttle_speed: 15.0,
    };

    let text = toml::to_string(&config).unwrap();
    let parsed: VehicleConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn partial_configs_fall_back_to_defaults() {
    let parsed: VehicleConfig = toml::from_str("steering_kp = 500.0").unwrap();
    assert_relative_eq!(parsed.steering_kp, 500.0);
    assert_eq!(parsed.steering_actuator, "steering");
    assert_eq!(parsed.wheel_actuators.len(), 2);
}

#[test]
fn duplicate_model_names_are_reported() {
    // Two model files both named "car" must fail loudly, not overwrite.
    let mut instances = ModelInstanceIdTable::new();
    instances.record("car").unwrap();
    instances.record("ramp").unwrap();

    let err = instances.record("car").unwrap_err();
    assert!(err.to_string().contains("car"));
    assert_eq!(instances.len(), 2);
}
