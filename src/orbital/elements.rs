use nalgebra::Vector3;

/// Gravitational parameter of the modeled Earth, m^3/s^2.
pub const MU_EARTH: f64 = 3.98589196e14;

/// Guard below which eccentricity / node magnitudes are treated as zero.
const EPS: f64 = 1e-10;

// ---------------------------------------------------------------------------
// Classical orbital elements
// ---------------------------------------------------------------------------

/// Classical Keplerian orbital elements. Angles in degrees.
///
/// Derived telemetry: recomputed from scratch every tick from the terminal
/// segment's Cartesian state, never persisted across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: f64,    // m
    pub eccentricity: f64,       // 0 = circular
    pub inclination: f64,        // deg
    pub ascending_node: f64,     // deg, right ascension of ascending node
    pub periapsis_argument: f64, // deg
    pub true_anomaly: f64,       // deg
}

impl OrbitalElements {
    /// Convert a Cartesian state to orbital elements around the modeled Earth.
    pub fn from_cartesian(pos: &Vector3<f64>, vel: &Vector3<f64>) -> Self {
        Self::from_cartesian_mu(pos, vel, MU_EARTH)
    }

    /// Convert with an explicit gravitational parameter.
    ///
    /// Degenerate-orbit convention: for an equatorial orbit the node vector
    /// vanishes and both the ascending node and the periapsis argument are
    /// reported as 0 (not physically exact, documented limitation). Every
    /// `acos` argument is clamped to [-1, 1] so near-circular and
    /// near-equatorial states cannot produce NaN through float drift.
    pub fn from_cartesian_mu(pos: &Vector3<f64>, vel: &Vector3<f64>, mu: f64) -> Self {
        let r = pos.norm();

        // Vis-viva
        let semi_major_axis = 1.0 / (2.0 / r - vel.norm_squared() / mu);

        // Specific angular momentum and eccentricity vector
        let h = pos.cross(vel);
        let e_vec = vel.cross(&h) / mu - pos / r;
        let eccentricity = e_vec.norm();

        let inclination = (h.z / h.norm()).clamp(-1.0, 1.0).acos();

        // Node vector: intersection of the orbital and equatorial planes
        let n = Vector3::new(-h.y, h.x, 0.0);
        let n_mag = n.norm();

        let ascending_node = if n_mag < EPS {
            0.0
        } else {
            let raan = (n.x / n_mag).clamp(-1.0, 1.0).acos();
            if n.y < 0.0 {
                2.0 * std::f64::consts::PI - raan
            } else {
                raan
            }
        };

        let periapsis_argument = if n_mag < EPS || eccentricity < EPS {
            0.0
        } else {
            let argp = (n.dot(&e_vec) / (n_mag * eccentricity))
                .clamp(-1.0, 1.0)
                .acos();
            if e_vec.z < 0.0 {
                2.0 * std::f64::consts::PI - argp
            } else {
                argp
            }
        };

        // r·v >= 0: moving away from periapsis
        let true_anomaly = if eccentricity < EPS {
            0.0
        } else {
            let nu = (e_vec.dot(pos) / (eccentricity * r))
                .clamp(-1.0, 1.0)
                .acos();
            if pos.dot(vel) < 0.0 {
                2.0 * std::f64::consts::PI - nu
            } else {
                nu
            }
        };

        OrbitalElements {
            semi_major_axis,
            eccentricity,
            inclination: inclination.to_degrees(),
            ascending_node: ascending_node.to_degrees(),
            periapsis_argument: periapsis_argument.to_degrees(),
            true_anomaly: true_anomaly.to_degrees(),
        }
    }
}
