use nalgebra::Vector3;

use ascent_sim::environment::planet::EARTH_RADIUS;
use ascent_sim::vehicle::presets;
use ascent_sim::{Command, PlanetConfig, ScriptedControls, SimConfig, Simulation, Vessel};

fn main() {
    // -----------------------------------------------------------------------
    // Scenario: two-stage launcher on the pad at the +x launch site
    // -----------------------------------------------------------------------
    let craft_config = presets::two_stage_stack(
        Vector3::new(EARTH_RADIUS + 4.0, 0.0, 0.0),
        Vector3::zeros(),
    );
    let config = SimConfig::default();
    let mut sim = Simulation::new(config, &PlanetConfig::default(), &craft_config)
        .expect("valid scenario configuration");

    // Flight plan: first-stage burn, separate, second-stage burn, separate
    let mut script = ScriptedControls::new()
        .hold(2.0, 180.0, Command::FireEngine)
        .hold(180.0, 181.0, Command::Separate(0))
        .hold(181.0, 420.0, Command::FireEngine)
        .hold(420.0, 421.0, Command::Separate(1));

    let flight_time = 600.0;
    let ticks = (flight_time / sim.dt()) as usize;

    println!();
    println!("====================================================================");
    println!("  STAGED ASCENT — {} launch", sim.planet.name);
    println!("====================================================================");
    println!();
    println!(
        "  Body: mass {:.3e} kg, radius {:.0} m, spin {:.4e} rad/s",
        sim.planet.mass, sim.planet.radius, sim.planet.spin_rate
    );
    println!(
        "  Craft: {} segments, thrust {:.0} N",
        sim.craft.bodies().len(),
        craft_config.thrust
    );
    println!();
    println!(
        "  {:>7}  {:>9}  {:>9}  {:>5}  {:>6}  {:>12}  {:>7}",
        "t (s)", "alt (m)", "vel (m/s)", "phase", "ground", "sma (m)", "ecc"
    );
    println!("  {}", "─".repeat(68));

    let mut apogee = 0.0_f64;
    let mut max_speed = 0.0_f64;
    let sample_interval = (ticks / 30).max(1);

    for i in 0..ticks {
        if let Err(err) = sim.tick(&script) {
            eprintln!("simulation aborted: {err}");
            std::process::exit(1);
        }
        script.advance(sim.dt());

        let speed = sim
            .world
            .body(sim.craft.terminal_body())
            .linvel()
            .norm();
        apogee = apogee.max(sim.telemetry.altitude());
        max_speed = max_speed.max(speed);

        if i % sample_interval == 0 || i == ticks - 1 {
            let el = sim.telemetry.elements();
            println!(
                "  {:>7.1}  {:>9.0}  {:>9.1}  {:>5}  {:>6}  {:>12.0}  {:>7.4}",
                sim.time(),
                sim.telemetry.altitude(),
                speed,
                sim.craft.flight_phase(),
                if sim.telemetry.is_grounded() { "yes" } else { "no" },
                el.semi_major_axis,
                el.eccentricity,
            );
        }
    }

    println!();
    println!("  Flight Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Apogee:        {:>10.0} m  ({:.2} km)", apogee, apogee / 1000.0);
    println!("  Max speed:     {:>10.1} m/s", max_speed);
    println!("  Final phase:   {:>10}", sim.craft.flight_phase());
    let el = sim.telemetry.elements();
    println!("  Final orbit:   a = {:.0} m, e = {:.4}, i = {:.2}°", el.semi_major_axis, el.eccentricity, el.inclination);
    println!("  Simulation:    {} ticks, dt = {:.4} s", ticks, sim.dt());
    println!("====================================================================");
    println!();
}
