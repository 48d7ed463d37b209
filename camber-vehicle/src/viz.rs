use nalgebra::{DMatrix, DVector};

use camber_core::AffineAdapter;

/// The adapter from simple-car state to a floating-joint pose.
///
/// Maps `[x, y, heading, speed]` onto `[x, y, z, roll, pitch, yaw]`:
/// planar position passes through, heading becomes yaw, and the out-of-
/// plane coordinates stay zero. External visualizers consume this layout
/// directly, wired in as a cascade stage behind a scripted car.
pub fn pose_adapter() -> AffineAdapter {
    let mut map = DMatrix::zeros(6, 4);
    map[(0, 0)] = 1.0; // x
    map[(1, 1)] = 1.0; // y
    map[(5, 2)] = 1.0; // yaw <- heading
    AffineAdapter::new(map, DVector::zeros(6))
        .expect("the pose map dimensions are fixed")
        .named("floating_joint_pose")
}
