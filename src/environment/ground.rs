use log::info;
use nalgebra::Vector3;

use crate::errors::SimError;
use crate::physics::engine::PhysicsWorld;
use crate::vehicle::Vessel;

use super::planet::Planet;

// ---------------------------------------------------------------------------
// Contact state
// ---------------------------------------------------------------------------

/// Per-tick ground contact result. Recomputed every tick, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct ContactState {
    pub grounded: bool,
    /// Displacement of the surface under the craft since the previous tick,
    /// caused by the body's spin.
    pub ground_delta: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// Ground coupling controller
// ---------------------------------------------------------------------------

/// Keeps a parked craft rigidly co-rotating with the spinning body instead of
/// simulating full contact dynamics.
///
/// Each tick, before integration: advances the body spin, measures how far a
/// surface marker fixed in the spinning frame moved, re-seats the kinematic
/// ground plane under the craft's terminal segment, and queries the engine's
/// contact list. While contact holds every segment gets the grounded damping
/// values and the marker displacement; once contact is lost damping reverts
/// to free flight and no translation is forced.
pub struct GroundCoupling {
    pub grounded_linear_damping: f64,
    pub grounded_angular_damping: f64,
    marker_local: Option<Vector3<f64>>,
    marker_prev: Option<Vector3<f64>>,
}

impl GroundCoupling {
    pub fn new() -> Self {
        GroundCoupling {
            grounded_linear_damping: 0.4,
            grounded_angular_damping: 0.8,
            marker_local: None,
            marker_prev: None,
        }
    }

    /// Run one pre-integration update. Must be called before the engine
    /// integrates the same tick, since it rewrites segment positions.
    pub fn update(
        &mut self,
        world: &mut PhysicsWorld,
        planet: &mut Planet,
        craft: &mut dyn Vessel,
        dt: f64,
    ) -> Result<ContactState, SimError> {
        planet.advance_spin(dt);

        let anchor = *world.bodies[craft.terminal_body()].translation();

        // Surface marker: the launch-site direction, captured once in the
        // spinning frame the first time the controller runs.
        let marker_local = *self.marker_local.get_or_insert_with(|| {
            let dir = anchor / anchor.norm();
            planet.spin().inverse() * (dir * planet.radius)
        });
        let marker_world = planet.spin() * marker_local;
        let ground_delta = marker_world - self.marker_prev.unwrap_or(marker_world);
        self.marker_prev = Some(marker_world);

        planet.place_ground_plane(world, &anchor);

        let grounded = world.in_contact(planet.ground_collider(), craft.lowest_collider()?);
        if grounded != craft.is_grounded() {
            if grounded {
                info!("ground contact acquired");
            } else {
                info!("ground contact lost (liftoff)");
            }
        }

        let (lin, ang) = if grounded {
            (self.grounded_linear_damping, self.grounded_angular_damping)
        } else {
            (0.0, 0.0)
        };
        craft.set_grounded(grounded, &ground_delta, lin, ang, &mut world.bodies);

        Ok(ContactState {
            grounded,
            ground_delta,
        })
    }
}

impl Default for GroundCoupling {
    fn default() -> Self {
        Self::new()
    }
}
