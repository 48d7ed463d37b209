use serde::{Deserialize, Serialize};

/// Names and gains wiring a [`DrivingCommand`](crate::DrivingCommand) to a
/// vehicle plant.
///
/// The defaults match the actuator names vehicle models are expected to
/// declare: one `steering` actuator controlled by position, and wheel
/// actuators controlled by velocity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// The position-controlled steering actuator.
    pub steering_actuator: String,
    /// The velocity-controlled wheel actuators.
    pub wheel_actuators: Vec<String>,
    /// Proportional gain on steering position error.
    pub steering_kp: f64,
    /// Derivative gain on steering velocity error.
    pub steering_kd: f64,
    /// Derivative gain tracking the wheel speed target.
    pub wheel_kd: f64,
    /// Wheel speed target at full throttle, radians per second.
    pub throttle_speed: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            steering_actuator: "steering".to_owned(),
            wheel_actuators: vec![
                "left_wheel_joint".to_owned(),
                "right_wheel_joint".to_owned(),
            ],
            steering_kp: 400.0,
            steering_kd: 80.0,
            wheel_kd: 100.0,
            throttle_speed: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_name_the_expected_actuators() {
        let config = VehicleConfig::default();
        assert_eq!(config.steering_actuator, "steering");
        assert_eq!(
            config.wheel_actuators,
            ["left_wheel_joint", "right_wheel_joint"]
        );
        assert!(config.steering_kp > 0.0);
    }
}
