pub mod input;
pub mod runner;

pub use input::{Command, ControlInputs, InputState, ScriptedControls};
pub use runner::{SimConfig, Simulation};
