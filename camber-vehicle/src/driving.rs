use camber_core::PortVector;

/// An external driving command: steering angle plus pedal positions.
///
/// The port layout is `[steering_angle, throttle, brake]`. Throttle and
/// brake are unitless pedal fractions in `[0, 1]`; the reference gain
/// turns their difference into a wheel speed target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrivingCommand {
    /// Steering angle target, radians.
    pub steering_angle: f64,
    /// Accelerator pedal position.
    pub throttle: f64,
    /// Brake pedal position.
    pub brake: f64,
}

impl DrivingCommand {
    /// Width of the driving-command port.
    pub const WIDTH: usize = 3;

    /// The command as a port vector.
    pub fn port(&self) -> PortVector {
        PortVector::from_vec(
            "driving_command",
            vec![self.steering_angle, self.throttle, self.brake],
        )
    }
}
