use crate::orbital::elements::OrbitalElements;

// ---------------------------------------------------------------------------
// Telemetry store
// ---------------------------------------------------------------------------

/// Observable flight telemetry, owned by the simulation root.
///
/// The craft writes into it once per tick (after integration); UI/display
/// consumers read from it. Explicit update-and-read contract — there is no
/// ambient global state.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    altitude: f64,
    elements: OrbitalElements,
    grounded: bool,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the craft state for this tick. Overwrites the previous tick.
    pub fn record(&mut self, altitude: f64, elements: OrbitalElements, grounded: bool) {
        self.altitude = altitude;
        self.elements = elements;
        self.grounded = grounded;
    }

    /// Meters above the body surface, from the terminal segment.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Orbital elements of the terminal segment, for orbit-path redraw.
    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }
}
