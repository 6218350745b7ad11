use log::info;
use nalgebra::{UnitQuaternion, Vector3};
use rapier3d::prelude::{
    point, vector, ColliderBuilder, ColliderHandle, FixedJointBuilder, ImpulseJointHandle,
    ImpulseJointSet, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use crate::errors::SimError;
use crate::orbital::elements::OrbitalElements;
use crate::physics::engine::PhysicsWorld;
use crate::sim::input::{Command, ControlInputs};
use crate::telemetry::Telemetry;
use crate::environment::planet::Planet;

use super::segment::{validate_stack, SegmentKind, SegmentSpec};
use super::Vessel;

// ---------------------------------------------------------------------------
// Stage link
// ---------------------------------------------------------------------------

/// Rigid zero-clearance joint between adjacent segments. Severable exactly
/// once, never re-enabled.
///
/// `max_force` is the configured transmissible-force limit carried from the
/// craft config; the engine's fixed joints do not enforce a solver-side
/// limit, so the value is recorded on the link only.
pub struct StageLink {
    joint: Option<ImpulseJointHandle>,
    pub max_force: f64,
}

impl StageLink {
    pub fn is_enabled(&self) -> bool {
        self.joint.is_some()
    }

    fn sever(&mut self, joints: &mut ImpulseJointSet) {
        if let Some(handle) = self.joint.take() {
            joints.remove(handle, true);
        }
    }
}

// ---------------------------------------------------------------------------
// Craft configuration
// ---------------------------------------------------------------------------

/// Construction parameters for a multi-segment craft. Trusted configuration,
/// validated once; construction fails fast on bad values.
#[derive(Debug, Clone)]
pub struct CraftConfig {
    /// Ordered engine→capsule. Indices are fixed for the craft's lifetime.
    pub segments: Vec<SegmentSpec>,
    /// World position of the lowest segment's center at spawn.
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    /// Constant engine force magnitude, N.
    pub thrust: f64,
    /// Attitude torque magnitude (scaled by dt when applied), N·m/s.
    pub attitude_torque: f64,
    /// Impulse pushing the freed upper stack away at separation, N·s.
    pub separation_impulse: f64,
    /// Transmissible-force limit recorded on every stage link.
    pub link_max_force: f64,
}

// ---------------------------------------------------------------------------
// Multi-segment craft
// ---------------------------------------------------------------------------

/// A chain of rigid segments joined by severable stage links.
///
/// Segments are stacked along the world +x axis at spawn, each body rotated a
/// quarter turn about z so its local +y (thrust) axis points along +x. The
/// flight phase counter selects the active engine, the active decoupler (the
/// only segment receiving attitude torque) and the next link to sever; it
/// only ever increases.
pub struct MultiSegmentCraft {
    bodies: Vec<RigidBodyHandle>,
    colliders: Vec<ColliderHandle>,
    links: Vec<StageLink>,
    engines: Vec<usize>,
    decouplers: Vec<usize>,
    flight_phase: usize,
    grounded: bool,
    thrust: f64,
    attitude_torque: f64,
    separation_impulse: f64,
    elements: OrbitalElements,
}

impl MultiSegmentCraft {
    pub fn new(world: &mut PhysicsWorld, config: &CraftConfig) -> Result<Self, SimError> {
        validate_stack(&config.segments)?;
        for (label, value) in [
            ("thrust", config.thrust),
            ("attitude_torque", config.attitude_torque),
            ("separation_impulse", config.separation_impulse),
            ("link_max_force", config.link_max_force),
        ] {
            if value <= 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "{label} must be positive, got {value}"
                )));
            }
        }

        // Local +y up, rotated onto world +x
        let upright = vector![0.0, 0.0, -std::f64::consts::FRAC_PI_2];

        let mut bodies = Vec::with_capacity(config.segments.len());
        let mut colliders = Vec::with_capacity(config.segments.len());
        let mut offset = 0.0;
        for (i, spec) in config.segments.iter().enumerate() {
            if i > 0 {
                offset += (config.segments[i - 1].length + spec.length) / 2.0;
            }
            let center = config.position + Vector3::x() * offset;
            let rb = RigidBodyBuilder::dynamic()
                .translation(vector![center.x, center.y, center.z])
                .linvel(vector![
                    config.velocity.x,
                    config.velocity.y,
                    config.velocity.z
                ])
                .rotation(upright)
                .build();
            let handle = world.bodies.insert(rb);
            let collider = ColliderBuilder::cylinder(spec.length / 2.0, spec.radius)
                .mass(spec.mass)
                .build();
            colliders.push(
                world
                    .colliders
                    .insert_with_parent(collider, handle, &mut world.bodies),
            );
            bodies.push(handle);
        }

        let mut links = Vec::with_capacity(config.segments.len() - 1);
        for i in 0..config.segments.len() - 1 {
            let joint = FixedJointBuilder::new()
                .local_anchor1(point![0.0, config.segments[i].length / 2.0, 0.0])
                .local_anchor2(point![0.0, -config.segments[i + 1].length / 2.0, 0.0])
                .contacts_enabled(false);
            let handle = world
                .impulse_joints
                .insert(bodies[i], bodies[i + 1], joint, true);
            links.push(StageLink {
                joint: Some(handle),
                max_force: config.link_max_force,
            });
        }

        let engines = indices_of(&config.segments, SegmentKind::Engine);
        let decouplers = indices_of(&config.segments, SegmentKind::Decoupler);

        let terminal = *bodies.last().expect("validated non-empty stack");
        let rb = &world.bodies[terminal];
        let elements = OrbitalElements::from_cartesian(rb.translation(), rb.linvel());

        Ok(MultiSegmentCraft {
            bodies,
            colliders,
            links,
            engines,
            decouplers,
            flight_phase: 0,
            grounded: false,
            thrust: config.thrust,
            attitude_torque: config.attitude_torque,
            separation_impulse: config.separation_impulse,
            elements,
        })
    }

    pub fn flight_phase(&self) -> usize {
        self.flight_phase
    }

    /// Segment index receiving the fire-engine force in the current phase.
    pub fn active_engine(&self) -> usize {
        self.engines[self.flight_phase.min(self.engines.len() - 1)]
    }

    /// Decoupler segment index receiving attitude torque in the current
    /// phase; the rest of the stack only feels it through the stage links.
    pub fn active_core(&self) -> usize {
        self.decouplers[self.flight_phase.min(self.decouplers.len() - 1)]
    }

    /// Orbital elements recomputed on the last step, for orbit-path redraw.
    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn links(&self) -> &[StageLink] {
        &self.links
    }

    /// Separate stage `stage`: sever the link above its decoupler, push the
    /// freed upper stack away and advance the phase.
    ///
    /// One-way and idempotent: the command only fires while `stage` is the
    /// current phase and a decoupler remains, otherwise it is a no-op (not an
    /// error). Returns whether a separation happened.
    pub fn separate_stage(&mut self, stage: usize, world: &mut PhysicsWorld) -> bool {
        if stage != self.flight_phase || stage >= self.decouplers.len() {
            return false;
        }
        let link_idx = self.decouplers[stage];
        self.links[link_idx].sever(&mut world.impulse_joints);

        let freed = self.bodies[link_idx + 1];
        let rb = &mut world.bodies[freed];
        let up = rb.position().rotation * Vector3::y();
        rb.apply_impulse(up * self.separation_impulse, true);

        self.flight_phase += 1;
        info!(
            "stage {} separated, flight phase {}",
            stage, self.flight_phase
        );
        true
    }

    fn apply_thrust(&self, world: &mut PhysicsWorld) {
        let rb = &mut world.bodies[self.bodies[self.active_engine()]];
        let up = rb.position().rotation * Vector3::y();
        rb.add_force(up * self.thrust, true);
    }

    fn apply_attitude(&self, world: &mut PhysicsWorld, input: &dyn ControlInputs, dt: f64) {
        const AXES: [(Command, [f64; 3]); 6] = [
            (Command::PitchUp, [1.0, 0.0, 0.0]),
            (Command::PitchDown, [-1.0, 0.0, 0.0]),
            (Command::YawLeft, [0.0, 1.0, 0.0]),
            (Command::YawRight, [0.0, -1.0, 0.0]),
            (Command::RollLeft, [0.0, 0.0, 1.0]),
            (Command::RollRight, [0.0, 0.0, -1.0]),
        ];
        let rb = &mut world.bodies[self.bodies[self.active_core()]];
        let rotation = rb.position().rotation;
        for (command, axis) in AXES {
            if input.is_active(command) {
                let local = Vector3::from(axis) * self.attitude_torque * dt;
                rb.add_torque(rotation * local, true);
            }
        }
    }
}

fn indices_of(specs: &[SegmentSpec], kind: SegmentKind) -> Vec<usize> {
    specs
        .iter()
        .enumerate()
        .filter(|(_, s)| s.kind == kind)
        .map(|(i, _)| i)
        .collect()
}

impl Vessel for MultiSegmentCraft {
    fn step(
        &mut self,
        world: &mut PhysicsWorld,
        input: &dyn ControlInputs,
        planet: &Planet,
        telemetry: &mut Telemetry,
        dt: f64,
    ) {
        if input.is_active(Command::FireEngine) {
            self.apply_thrust(world);
        }
        if input.is_active(Command::Separate(self.flight_phase)) {
            self.separate_stage(self.flight_phase, world);
        }
        self.apply_attitude(world, input, dt);

        let rb = &world.bodies[self.terminal_body()];
        self.elements = OrbitalElements::from_cartesian(rb.translation(), rb.linvel());
        let altitude = planet.altitude_of(rb.translation());
        telemetry.record(altitude, self.elements, self.grounded);
    }

    fn bodies(&self) -> &[RigidBodyHandle] {
        &self.bodies
    }

    fn terminal_body(&self) -> RigidBodyHandle {
        *self.bodies.last().expect("validated non-empty stack")
    }

    fn transforms(&self, world: &PhysicsWorld) -> Vec<(Vector3<f64>, UnitQuaternion<f64>)> {
        self.bodies
            .iter()
            .map(|&h| {
                let rb = world.body(h);
                (*rb.translation(), *rb.rotation())
            })
            .collect()
    }

    fn colliders(&self) -> Result<&[ColliderHandle], SimError> {
        Ok(&self.colliders)
    }

    fn set_grounded(
        &mut self,
        grounded: bool,
        ground_delta: &Vector3<f64>,
        linear_damping: f64,
        angular_damping: f64,
        bodies: &mut RigidBodySet,
    ) {
        self.grounded = grounded;
        for &handle in &self.bodies {
            let rb = &mut bodies[handle];
            rb.set_linear_damping(linear_damping);
            rb.set_angular_damping(angular_damping);
            if grounded {
                let translated = rb.translation() + ground_delta;
                rb.set_translation(translated, true);
            }
        }
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::planet::PlanetConfig;
    use crate::vehicle::presets;

    fn setup() -> (PhysicsWorld, Planet, MultiSegmentCraft) {
        let mut world = PhysicsWorld::new();
        let planet = Planet::new(&mut world, &PlanetConfig::default()).unwrap();
        let config = presets::two_stage_stack(
            Vector3::new(planet.radius + 4.0, 0.0, 0.0),
            Vector3::zeros(),
        );
        let craft = MultiSegmentCraft::new(&mut world, &config).unwrap();
        (world, planet, craft)
    }

    #[test]
    fn stack_builds_chain_of_links() {
        let (_, _, craft) = setup();
        assert_eq!(craft.bodies().len(), 7);
        assert_eq!(craft.links().len(), 6);
        assert!(craft.links().iter().all(StageLink::is_enabled));
        assert_eq!(craft.flight_phase(), 0);
        assert_eq!(craft.active_engine(), 0);
        assert_eq!(craft.active_core(), 2);
    }

    #[test]
    fn segments_stack_outward_along_launch_axis() {
        let (world, _, craft) = setup();
        let xs: Vec<f64> = craft
            .bodies()
            .iter()
            .map(|&h| world.body(h).translation().x)
            .collect();
        assert!(xs.windows(2).all(|w| w[1] > w[0]), "stack not ordered: {xs:?}");
    }

    #[test]
    fn separation_advances_phase_and_disables_one_link() {
        let (mut world, _, mut craft) = setup();
        assert!(craft.separate_stage(0, &mut world));
        assert_eq!(craft.flight_phase(), 1);
        let disabled: Vec<usize> = craft
            .links()
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_enabled())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(disabled, vec![2]);
        assert_eq!(craft.active_engine(), 3);
        assert_eq!(craft.active_core(), 5);
    }

    #[test]
    fn separation_is_idempotent() {
        let (mut world, _, mut craft) = setup();
        assert!(craft.separate_stage(0, &mut world));
        // Repeating the already-passed phase has no further effect
        assert!(!craft.separate_stage(0, &mut world));
        assert_eq!(craft.flight_phase(), 1);
        let disabled = craft.links().iter().filter(|l| !l.is_enabled()).count();
        assert_eq!(disabled, 1);
    }

    #[test]
    fn separation_past_last_decoupler_is_noop() {
        let (mut world, _, mut craft) = setup();
        assert!(craft.separate_stage(0, &mut world));
        assert!(craft.separate_stage(1, &mut world));
        assert_eq!(craft.flight_phase(), 2);
        assert!(!craft.separate_stage(2, &mut world));
        assert_eq!(craft.flight_phase(), 2);
        // Post-staging assignments hold at the final phase
        assert_eq!(craft.active_engine(), 3);
        assert_eq!(craft.active_core(), 5);
    }

    #[test]
    fn separation_impulse_pushes_freed_stack_outward() {
        let (mut world, _, mut craft) = setup();
        craft.separate_stage(0, &mut world);
        // Freed segment is the second engine (index 3), pushed along +x
        let vel = world.body(craft.bodies()[3]).linvel();
        assert!(vel.x > 0.0, "freed segment should move away, got {vel:?}");
    }

    #[test]
    fn grounded_damping_and_delta_apply_to_every_segment() {
        let (mut world, _, mut craft) = setup();
        let before: Vec<_> = craft
            .bodies()
            .iter()
            .map(|&h| *world.body(h).translation())
            .collect();
        let delta = Vector3::new(0.0, 7.7, 0.0);
        craft.set_grounded(true, &delta, 0.4, 0.8, &mut world.bodies);
        for (i, &h) in craft.bodies().iter().enumerate() {
            let rb = world.body(h);
            assert_eq!(rb.linear_damping(), 0.4);
            assert_eq!(rb.angular_damping(), 0.8);
            assert_eq!(rb.translation() - before[i], delta);
        }
        craft.set_grounded(false, &Vector3::zeros(), 0.0, 0.0, &mut world.bodies);
        for (i, &h) in craft.bodies().iter().enumerate() {
            let rb = world.body(h);
            assert_eq!(rb.linear_damping(), 0.0);
            // No forced translation once contact is lost
            assert_eq!(rb.translation() - before[i], delta);
        }
    }

    #[test]
    fn rejects_nonpositive_thrust() {
        let mut world = PhysicsWorld::new();
        let mut config =
            presets::two_stage_stack(Vector3::new(6_371_004.0, 0.0, 0.0), Vector3::zeros());
        config.thrust = 0.0;
        assert!(MultiSegmentCraft::new(&mut world, &config).is_err());
    }
}
