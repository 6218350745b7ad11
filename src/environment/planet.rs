use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use rapier3d::prelude::{ColliderBuilder, ColliderHandle, RigidBodyBuilder, RigidBodyHandle};

use crate::errors::SimError;
use crate::physics::engine::PhysicsWorld;
use crate::physics::gravity::G;

// ---------------------------------------------------------------------------
// Earth preset
// ---------------------------------------------------------------------------

pub const EARTH_MASS: f64 = 5.972e24; // kg
pub const EARTH_RADIUS: f64 = 6_371_000.0; // m
pub const EARTH_SPIN_RATE: f64 = 7.292_115_9e-5; // rad/s, sidereal

/// Ground-plane collider half extents (m). A thin disc-like box aligned to
/// the surface point under the craft; the planet sphere itself is never a
/// collider.
const GROUND_HALF_EXTENTS: (f64, f64, f64) = (100.0, 100.0, 0.01);

// ---------------------------------------------------------------------------
// Celestial body
// ---------------------------------------------------------------------------

/// Construction parameters for a celestial body. Trusted configuration,
/// validated once at construction: no runtime recovery for bad values.
#[derive(Debug, Clone)]
pub struct PlanetConfig {
    pub name: String,
    pub mass: f64,      // kg
    pub radius: f64,    // m
    pub spin_rate: f64, // rad/s about the polar (+z) axis
}

impl Default for PlanetConfig {
    fn default() -> Self {
        PlanetConfig {
            name: "Earth".into(),
            mass: EARTH_MASS,
            radius: EARTH_RADIUS,
            spin_rate: EARTH_SPIN_RATE,
        }
    }
}

/// A rotating spherical body centered at the world origin.
///
/// Owns the kinematically driven ground-plane collider that gives a parked
/// craft something to rest on; the plane is renormalized onto the body radius
/// toward the craft every tick by the ground coupling controller.
pub struct Planet {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub spin_rate: f64,
    spin: UnitQuaternion<f64>,
    ground_body: RigidBodyHandle,
    ground_collider: ColliderHandle,
}

impl Planet {
    pub fn new(world: &mut PhysicsWorld, config: &PlanetConfig) -> Result<Self, SimError> {
        if config.mass <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "planet mass must be positive, got {}",
                config.mass
            )));
        }
        if config.radius <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "planet radius must be positive, got {}",
                config.radius
            )));
        }

        // Spawned under the +x launch site, normal facing outward; re-seated
        // toward the craft every tick by the coupling controller.
        let ground = RigidBodyBuilder::kinematic_position_based()
            .position(Isometry3::from_parts(
                Translation3::new(config.radius, 0.0, 0.0),
                look_rotation(&Vector3::x()),
            ))
            .build();
        let ground_body = world.bodies.insert(ground);
        let (hx, hy, hz) = GROUND_HALF_EXTENTS;
        let collider = ColliderBuilder::cuboid(hx, hy, hz).build();
        let ground_collider =
            world
                .colliders
                .insert_with_parent(collider, ground_body, &mut world.bodies);

        Ok(Planet {
            name: config.name.clone(),
            mass: config.mass,
            radius: config.radius,
            spin_rate: config.spin_rate,
            spin: UnitQuaternion::identity(),
            ground_body,
            ground_collider,
        })
    }

    /// Gravitational parameter `G·M`.
    pub fn mu(&self) -> f64 {
        G * self.mass
    }

    /// Meters above the surface for a world position.
    pub fn altitude_of(&self, pos: &Vector3<f64>) -> f64 {
        pos.norm() - self.radius
    }

    /// Current orientation of the spinning body frame.
    pub fn spin(&self) -> &UnitQuaternion<f64> {
        &self.spin
    }

    /// Advance the body spin by `spin_rate · dt` about the polar axis.
    pub fn advance_spin(&mut self, dt: f64) {
        let step = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.spin_rate * dt);
        self.spin = step * self.spin;
    }

    pub fn ground_collider(&self) -> ColliderHandle {
        self.ground_collider
    }

    /// Drive the ground plane to the surface point under `toward`, its normal
    /// facing the craft.
    pub fn place_ground_plane(&self, world: &mut PhysicsWorld, toward: &Vector3<f64>) {
        let norm = toward.norm();
        if norm == 0.0 {
            return;
        }
        let dir = toward / norm;
        let pose = Isometry3::from_parts(Translation3::from(dir * self.radius), look_rotation(&dir));
        // Teleport, not kinematic interpolation: the plane must carry no
        // surface velocity of its own — co-rotation is applied to the craft
        // by the coupling controller, never through contact friction.
        world.bodies[self.ground_body].set_position(pose, true);
    }
}

/// Orientation rotating the reference +z axis onto `dir`.
///
/// Replaces the look-at-through-a-scratch-mesh construction: operates purely
/// on orientation representations. `dir` must be unit length.
pub fn look_rotation(dir: &Vector3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::rotation_between(&Vector3::z(), dir)
        // Antiparallel case: any half-turn perpendicular to z works
        .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f64::consts::PI))
}
