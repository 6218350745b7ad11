use nalgebra::Vector3;
use rapier3d::prelude::{RigidBodyHandle, RigidBodySet};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

/// Universal gravitational constant, m^3/(kg·s^2).
pub const G: f64 = 6.6743e-11;

// ---------------------------------------------------------------------------
// Inverse-square attraction
// ---------------------------------------------------------------------------

/// Gravitational force exerted on a segment of mass `seg_mass` at `seg_pos`
/// by a body of mass `body_mass` centered at `body_pos`.
///
/// `F = -G·M·m / r² · r̂` with `r` pointing from the body center to the
/// segment, so the returned force points back toward the body.
///
/// Precondition: the segment is not at the body center. The body radius keeps
/// every segment well outside it in practice.
pub fn newtonian_force(
    body_mass: f64,
    body_pos: &Vector3<f64>,
    seg_mass: f64,
    seg_pos: &Vector3<f64>,
) -> Vector3<f64> {
    let r = seg_pos - body_pos;
    let dist_sq = r.norm_squared();
    debug_assert!(dist_sq > 0.0, "segment coincides with attractor center");
    let dir = r / dist_sq.sqrt();
    -dir * (G * body_mass * seg_mass / dist_sq)
}

/// Queue gravity onto every segment's force accumulator for this tick.
///
/// Read-only with respect to the attractor; mutates only the segments'
/// accumulators. Must run before the engine integrates the same tick.
pub fn apply_gravity(
    bodies: &mut RigidBodySet,
    body_mass: f64,
    body_pos: &Vector3<f64>,
    segments: &[RigidBodyHandle],
) {
    for &handle in segments {
        let rb = &mut bodies[handle];
        let force = newtonian_force(body_mass, body_pos, rb.mass(), rb.translation());
        rb.add_force(force, true);
    }
}
