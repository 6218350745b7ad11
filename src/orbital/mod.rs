pub mod elements;
pub mod path;

pub use elements::{OrbitalElements, MU_EARTH};
