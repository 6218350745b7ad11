pub mod engine;
pub mod gravity;
