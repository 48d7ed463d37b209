//! Contact behavior of a plant dropped onto flat terrain.

use approx::assert_relative_eq;

use camber_core::{DynamicalSystem, PortVector};
use camber_multibody::{GRAVITY, RigidBodyTree};
use camber_solvers::{SimulationOptions, Simulator, Status};
use camber_vehicle::contact_defaults;
use integration_tests::dropped_puck_plant;

#[test]
fn terrain_adds_exactly_one_body_with_its_top_at_zero() {
    let mut tree = RigidBodyTree::new();
    let before = tree.num_bodies();
    tree.add_flat_terrain(1000.0, 10.0);

    assert_eq!(tree.num_bodies(), before + 1);
    let surfaces = tree.terrain_surfaces();
    assert_eq!(surfaces.len(), 1);
    assert_relative_eq!(surfaces[0].top, 0.0);
}

#[test]
fn hovering_above_terrain_the_only_force_is_gravity() {
    let plant = dropped_puck_plant(0.5);
    let derivative = plant
        .derivative(0.0, &plant.initial_state(), &PortVector::zeros("command", 0))
        .unwrap();

    assert_relative_eq!(derivative[0], 0.0);
    assert_relative_eq!(derivative[1], -GRAVITY, epsilon = 1e-9);
}

#[test]
fn a_dropped_puck_settles_onto_the_surface() {
    let plant = dropped_puck_plant(0.5).with_contact_parameters(contact_defaults());

    let options = SimulationOptions::default()
        .with_step_size(1e-3)
        .with_stop_time(2.0);
    let mut simulator = Simulator::new(options).unwrap();
    let solution = simulator.run(&plant, plant.initial_state()).unwrap();

    assert_eq!(solution.status, Status::Completed);
    let height = solution.final_state()[0];
    let speed = solution.final_state()[1];

    // At rest the penalty force balances the weight, so the puck sits
    // just below the surface at depth g/k.
    let rest_depth = GRAVITY / contact_defaults().stiffness;
    assert_relative_eq!(height, -rest_depth, epsilon = 1e-3);
    assert!(speed.abs() < 1e-2, "still moving at {speed}");
}

#[test]
fn doubled_terrain_doubles_the_support_known_quirk() {
    // Adding the terrain twice is not idempotent: both boxes push back,
    // so the rest depth halves. Recorded as the observed quirk, not a
    // desirable property.
    let mut tree = RigidBodyTree::new();
    tree.add_body(
        camber_multibody::BodyIndex::WORLD,
        camber_multibody::RigidBody::new("puck", 1.0, nalgebra::Matrix3::identity())
            .with_contact_point(nalgebra::Vector3::zeros()),
        camber_multibody::Joint::prismatic("drop", nalgebra::Vector3::z()),
    )
    .unwrap();
    tree.add_flat_terrain(1000.0, 10.0);
    tree.add_flat_terrain(1000.0, 10.0);
    let plant = camber_multibody::RigidBodyPlant::new(tree)
        .with_initial_position(nalgebra::dvector![0.5])
        .unwrap()
        .with_contact_parameters(contact_defaults());

    let options = SimulationOptions::default()
        .with_step_size(1e-3)
        .with_stop_time(2.0);
    let mut simulator = Simulator::new(options).unwrap();
    let solution = simulator.run(&plant, plant.initial_state()).unwrap();

    let rest_depth = GRAVITY / (2.0 * contact_defaults().stiffness);
    assert_relative_eq!(solution.final_state()[0], -rest_depth, epsilon = 1e-3);
}
