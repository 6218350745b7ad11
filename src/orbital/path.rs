use nalgebra::{Rotation3, Vector3};

use super::elements::OrbitalElements;

// ---------------------------------------------------------------------------
// Orbit-path sampling
// ---------------------------------------------------------------------------

/// Sample the conic described by `elements` as world-frame points, for an
/// external orbit-path display.
///
/// Sweeps the true anomaly over a full revolution with `step_deg` spacing and
/// rotates each perifocal point by Rz(RAAN)·Rx(inc)·Rz(argp). For hyperbolic
/// states only the physical branch is returned: samples past the asymptote,
/// where the conic equation yields a non-positive radius, are skipped.
pub fn trace(elements: &OrbitalElements, step_deg: f64) -> Vec<Vector3<f64>> {
    assert!(step_deg > 0.0, "step must be positive");

    let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.ascending_node.to_radians())
        * Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination.to_radians())
        * Rotation3::from_axis_angle(&Vector3::z_axis(), elements.periapsis_argument.to_radians());

    let a = elements.semi_major_axis;
    let e = elements.eccentricity;
    let semi_latus = a * (1.0 - e * e);

    let steps = (360.0 / step_deg).ceil() as usize;
    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let theta = (i as f64 * step_deg).to_radians();
        let r = semi_latus / (1.0 + e * theta.cos());
        // Past a hyperbolic asymptote the denominator flips sign and the
        // equation mirrors onto the unphysical branch
        if !r.is_finite() || r <= 0.0 {
            continue;
        }
        points.push(rot * Vector3::new(r * theta.cos(), r * theta.sin(), 0.0));
    }
    points
}
