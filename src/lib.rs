pub mod environment;
pub mod errors;
pub mod orbital;
pub mod physics;
pub mod sim;
pub mod telemetry;
pub mod vehicle;

// Convenience re-exports of the main surface
pub use crate::environment::{ContactState, GroundCoupling, Planet, PlanetConfig};
pub use crate::errors::SimError;
pub use crate::orbital::{OrbitalElements, MU_EARTH};
pub use crate::sim::{Command, ControlInputs, InputState, ScriptedControls, SimConfig, Simulation};
pub use crate::telemetry::Telemetry;
pub use crate::vehicle::{CraftConfig, MultiSegmentCraft, SegmentKind, SegmentSpec, Vessel};
