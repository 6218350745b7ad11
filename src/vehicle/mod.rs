pub mod craft;
pub mod segment;

pub use craft::{CraftConfig, MultiSegmentCraft, StageLink};
pub use segment::{SegmentKind, SegmentSpec};

use nalgebra::{UnitQuaternion, Vector3};
use rapier3d::prelude::{ColliderHandle, RigidBodyHandle, RigidBodySet};

use crate::environment::planet::Planet;
use crate::errors::SimError;
use crate::physics::engine::PhysicsWorld;
use crate::sim::input::ControlInputs;
use crate::telemetry::Telemetry;

// ---------------------------------------------------------------------------
// Vessel capability interface
// ---------------------------------------------------------------------------

/// Capability surface every flyable entity exposes to the driver and the
/// ground coupling controller.
///
/// The capability set is the multi-segment one. A variant without a
/// multi-segment collider list must fail loudly from `colliders()` rather
/// than silently returning an empty list, which is what the provided
/// implementation does.
pub trait Vessel {
    /// Per-tick control, staging and telemetry. Runs after the engine has
    /// integrated the tick; queued forces are consumed by the next tick.
    fn step(
        &mut self,
        world: &mut PhysicsWorld,
        input: &dyn ControlInputs,
        planet: &Planet,
        telemetry: &mut Telemetry,
        dt: f64,
    );

    /// Rigid bodies of every segment, lowest first.
    fn bodies(&self) -> &[RigidBodyHandle];

    /// The terminal (capsule) segment: source of telemetry and orbit state.
    fn terminal_body(&self) -> RigidBodyHandle;

    /// World transforms for visual placement of each segment.
    fn transforms(&self, world: &PhysicsWorld) -> Vec<(Vector3<f64>, UnitQuaternion<f64>)>;

    /// Collider list, lowest segment first.
    fn colliders(&self) -> Result<&[ColliderHandle], SimError> {
        Err(SimError::Unsupported("multi-segment collider list"))
    }

    /// Collider of the lowest segment, the one the ground plane touches.
    fn lowest_collider(&self) -> Result<ColliderHandle, SimError> {
        Ok(self.colliders()?[0])
    }

    /// Ground-contact synchronization hook driven by the coupling controller.
    fn set_grounded(
        &mut self,
        grounded: bool,
        ground_delta: &Vector3<f64>,
        linear_damping: f64,
        angular_damping: f64,
        bodies: &mut RigidBodySet,
    );

    fn is_grounded(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Preset stacks
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Two-stage launcher: engine, 39 m booster, decoupler, second engine,
    /// 4 m booster, second decoupler, capsule.
    pub fn two_stage_stack(position: Vector3<f64>, velocity: Vector3<f64>) -> CraftConfig {
        let booster_radius = 1.85;
        let engine_radius = 1.8;
        CraftConfig {
            segments: vec![
                SegmentSpec::new(SegmentKind::Engine, 10.0, 2.0, engine_radius),
                SegmentSpec::new(SegmentKind::Tank, 10.0, 39.0, booster_radius),
                SegmentSpec::new(SegmentKind::Decoupler, 10.0, 1.0, booster_radius),
                SegmentSpec::new(SegmentKind::Engine, 10.0, 2.0, engine_radius),
                SegmentSpec::new(SegmentKind::Tank, 10.0, 4.0, booster_radius),
                SegmentSpec::new(SegmentKind::Decoupler, 10.0, 1.0, booster_radius),
                SegmentSpec::new(SegmentKind::Capsule, 10.0, 2.5, booster_radius),
            ],
            position,
            velocity,
            thrust: 1000.0,
            attitude_torque: 1000.0,
            separation_impulse: 100.0,
            link_max_force: 1e20,
        }
    }
}
