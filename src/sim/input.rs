use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Control commands
// ---------------------------------------------------------------------------

/// Named craft controls, polled once per tick as instantaneous flags.
///
/// Separation commands carry the target phase, one per stage, so holding a
/// separation input across ticks cannot chain through multiple stages: the
/// command only matches while its phase is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    FireEngine,
    Separate(usize),
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
}

/// Boolean control queries, polled once per tick. The simulation is agnostic
/// to how the activation state is captured.
pub trait ControlInputs {
    fn is_active(&self, command: Command) -> bool;
}

// ---------------------------------------------------------------------------
// Held-state input
// ---------------------------------------------------------------------------

/// Plain pressed/released control state for interactive front ends.
#[derive(Debug, Default)]
pub struct InputState {
    active: HashSet<Command>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, command: Command) {
        self.active.insert(command);
    }

    pub fn release(&mut self, command: Command) {
        self.active.remove(&command);
    }
}

impl ControlInputs for InputState {
    fn is_active(&self, command: Command) -> bool {
        self.active.contains(&command)
    }
}

// ---------------------------------------------------------------------------
// Scripted input
// ---------------------------------------------------------------------------

/// Time-windowed command schedule for headless runs: a command is active
/// while the script clock is inside its `[start, end)` window. The driver's
/// owner advances the clock once per tick.
#[derive(Debug, Default)]
pub struct ScriptedControls {
    schedule: Vec<(f64, f64, Command)>,
    clock: f64,
}

impl ScriptedControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hold(mut self, start: f64, end: f64, command: Command) -> Self {
        self.schedule.push((start, end, command));
        self
    }

    pub fn advance(&mut self, dt: f64) {
        self.clock += dt;
    }
}

impl ControlInputs for ScriptedControls {
    fn is_active(&self, command: Command) -> bool {
        self.schedule
            .iter()
            .any(|&(start, end, cmd)| cmd == command && self.clock >= start && self.clock < end)
    }
}
