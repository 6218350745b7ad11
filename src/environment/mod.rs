pub mod ground;
pub mod planet;

pub use ground::{ContactState, GroundCoupling};
pub use planet::{Planet, PlanetConfig};
