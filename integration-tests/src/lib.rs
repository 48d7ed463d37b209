//! Shared fixtures for the cross-crate scenario tests.

use nalgebra::{Matrix3, Vector3};

use camber_multibody::{BodyIndex, Joint, RigidBody, RigidBodyPlant, RigidBodyTree};

/// A unit mass sliding on a horizontal frictionless track, driven by one
/// actuator: the dynamics reduce to `ẍ = u`.
pub fn sliding_mass_plant() -> RigidBodyPlant {
    let mut tree = RigidBodyTree::new();
    tree.add_body(
        BodyIndex::WORLD,
        RigidBody::new("slider", 1.0, Matrix3::identity()),
        Joint::prismatic("track", Vector3::x()),
    )
    .expect("fresh tree accepts the slider");

    let mut plant = RigidBodyPlant::new(tree);
    plant
        .add_actuator("thruster", "track")
        .expect("the track joint exists");
    plant
}

/// A unit mass on a vertical track above flat terrain, touching the
/// ground with a single contact point at its origin.
pub fn dropped_puck_plant(initial_height: f64) -> RigidBodyPlant {
    let mut tree = RigidBodyTree::new();
    tree.add_body(
        BodyIndex::WORLD,
        RigidBody::new("puck", 1.0, Matrix3::identity()).with_contact_point(Vector3::zeros()),
        Joint::prismatic("drop", Vector3::z()),
    )
    .expect("fresh tree accepts the puck");
    tree.add_flat_terrain(1000.0, 10.0);

    RigidBodyPlant::new(tree)
        .with_initial_position(nalgebra::dvector![initial_height])
        .expect("one coordinate matches the one joint")
}

/// A steerable cart with the actuator names the default
/// [`VehicleConfig`](camber_vehicle::VehicleConfig) expects.
pub fn cart_plant() -> RigidBodyPlant {
    let mut tree = RigidBodyTree::new();
    let chassis = tree
        .add_body(
            BodyIndex::WORLD,
            RigidBody::new("chassis", 20.0, Matrix3::from_diagonal_element(1.0)),
            Joint::prismatic("chassis_slide", Vector3::x()),
        )
        .expect("fresh tree accepts the chassis");
    tree.add_body(
        chassis,
        RigidBody::new("steering_column", 1.0, Matrix3::from_diagonal_element(0.2)),
        Joint::revolute("steering", Vector3::z()),
    )
    .expect("chassis accepts the steering column");
    for (body, joint) in [
        ("left_wheel", "left_wheel_joint"),
        ("right_wheel", "right_wheel_joint"),
    ] {
        tree.add_body(
            chassis,
            RigidBody::new(body, 2.0, Matrix3::from_diagonal_element(0.5)),
            Joint::revolute(joint, Vector3::y()).with_damping(0.5),
        )
        .expect("chassis accepts the wheels");
    }

    let mut plant = RigidBodyPlant::new(tree);
    for name in ["steering", "left_wheel_joint", "right_wheel_joint"] {
        plant.add_actuator(name, name).expect("joints exist");
    }
    plant
}
