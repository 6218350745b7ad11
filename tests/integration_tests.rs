use approx::assert_relative_eq;
use nalgebra::Vector3;

use ascent_sim::environment::planet::EARTH_RADIUS;
use ascent_sim::vehicle::presets;
use ascent_sim::{
    Command, InputState, PlanetConfig, ScriptedControls, SimConfig, Simulation, Vessel,
};

fn pad_simulation() -> Simulation {
    let craft = presets::two_stage_stack(
        Vector3::new(EARTH_RADIUS + 4.0, 0.0, 0.0),
        Vector3::zeros(),
    );
    Simulation::new(SimConfig::default(), &PlanetConfig::default(), &craft)
        .expect("pad scenario must construct")
}

/// Run until the craft reports ground contact; panics if it never lands.
fn settle_on_pad(sim: &mut Simulation, max_ticks: usize) {
    let input = InputState::new();
    for _ in 0..max_ticks {
        let contact = sim.tick(&input).unwrap();
        if contact.grounded {
            return;
        }
    }
    panic!("craft never reached the pad within {max_ticks} ticks");
}

#[test]
fn free_fall_tick_accelerates_straight_toward_body_center() {
    let mut sim = pad_simulation();
    let input = InputState::new();
    sim.tick(&input).unwrap();

    for &handle in sim.craft.bodies() {
        let vel = sim.world.body(handle).linvel();
        assert!(
            vel.x < 0.0,
            "gravity must pull toward the origin, got {vel:?}"
        );
        assert_relative_eq!(vel.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(vel.z, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn reported_altitude_is_terminal_distance_minus_radius() {
    let mut sim = pad_simulation();
    let input = InputState::new();
    sim.tick(&input).unwrap();

    let terminal = sim.world.body(sim.craft.terminal_body()).translation().norm();
    assert_eq!(sim.telemetry.altitude(), terminal - sim.planet.radius);
}

#[test]
fn grounded_craft_corotates_with_the_surface() {
    let mut sim = pad_simulation();
    let input = InputState::new();
    settle_on_pad(&mut sim, 600);

    // Let contact dynamics settle before measuring
    for _ in 0..300 {
        sim.tick(&input).unwrap();
    }

    let before: Vec<Vector3<f64>> = sim
        .craft
        .bodies()
        .iter()
        .map(|&h| *sim.world.body(h).translation())
        .collect();
    let contact = sim.tick(&input).unwrap();
    assert!(contact.grounded, "craft should stay parked on the pad");
    assert!(
        contact.ground_delta.norm() > 1.0,
        "spinning surface should displace the pad every tick, got {:?}",
        contact.ground_delta
    );

    for (i, &handle) in sim.craft.bodies().iter().enumerate() {
        let moved = sim.world.body(handle).translation() - before[i];
        // Forced co-rotation dominates; contact settling contributes only
        // residual motion
        assert!(
            (moved - contact.ground_delta).norm() < 0.05 * contact.ground_delta.norm(),
            "segment {i} moved {moved:?}, pad moved {:?}",
            contact.ground_delta
        );
        assert_eq!(sim.world.body(handle).linear_damping(), 0.4);
        assert_eq!(sim.world.body(handle).angular_damping(), 0.8);
    }
}

#[test]
fn losing_contact_restores_free_flight_damping() {
    let mut sim = pad_simulation();
    settle_on_pad(&mut sim, 600);

    // Lift the whole stack clear of the pad
    for &handle in &sim.craft.bodies().to_vec() {
        let rb = &mut sim.world.bodies[handle];
        let raised = rb.translation() + Vector3::new(100.0, 0.0, 0.0);
        rb.set_translation(raised, true);
    }
    let input = InputState::new();
    let contact = sim.tick(&input).unwrap();

    assert!(!contact.grounded);
    for &handle in sim.craft.bodies() {
        assert_eq!(sim.world.body(handle).linear_damping(), 0.0);
        assert_eq!(sim.world.body(handle).angular_damping(), 0.0);
    }
}

#[test]
fn thrust_lifts_the_stack_off_the_pad() {
    let mut sim = pad_simulation();
    settle_on_pad(&mut sim, 600);
    let dt = sim.dt();

    let mut script = ScriptedControls::new().hold(0.0, 30.0, Command::FireEngine);
    let start_altitude = sim.telemetry.altitude();
    let mut lifted = false;
    for _ in 0..(30.0 / dt) as usize {
        let contact = sim.tick(&script).unwrap();
        script.advance(dt);
        if !contact.grounded && sim.telemetry.altitude() > start_altitude + 10.0 {
            lifted = true;
            break;
        }
    }
    assert!(lifted, "1000 N on a 70 kg stack must out-climb gravity");

    // Radial speed is positive once airborne
    let terminal = sim.world.body(sim.craft.terminal_body());
    let radial = terminal.linvel().dot(&terminal.translation().normalize());
    assert!(radial > 0.0, "climbing craft should have outward velocity");
}

#[test]
fn full_flight_plan_separates_both_stages_exactly_once() {
    let mut sim = pad_simulation();
    let dt = sim.dt();
    let mut script = ScriptedControls::new()
        .hold(0.0, 20.0, Command::FireEngine)
        // Held over generous windows: only the matching phase ever fires
        .hold(5.0, 8.0, Command::Separate(0))
        .hold(12.0, 15.0, Command::Separate(1));

    for _ in 0..(20.0 / dt) as usize {
        sim.tick(&script).unwrap();
        script.advance(dt);
    }

    assert_eq!(sim.craft.flight_phase(), 2);
    let disabled = sim
        .craft
        .links()
        .iter()
        .filter(|link| !link.is_enabled())
        .count();
    assert_eq!(disabled, 2, "each separation severs exactly one link");

    let elements = sim.telemetry.elements();
    assert!(elements.semi_major_axis.is_finite());
    assert!(elements.eccentricity.is_finite());
}
