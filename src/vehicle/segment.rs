use crate::errors::SimError;

// ---------------------------------------------------------------------------
// Segment specification
// ---------------------------------------------------------------------------

/// Role of a segment within the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Thrust source. The active engine receives the fire-engine force.
    Engine,
    /// Structural/propellant section, passive.
    Tank,
    /// Severance point: its upper link is the one disabled at separation, and
    /// the active decoupler receives attitude torque.
    Decoupler,
    /// Terminal segment: telemetry and orbit state are read from it.
    Capsule,
}

/// Geometry and mass of one rigid segment. Cylinder collider along the
/// segment's local up axis.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub kind: SegmentKind,
    pub mass: f64,   // kg
    pub length: f64, // m, along the stack axis
    pub radius: f64, // m
}

impl SegmentSpec {
    pub fn new(kind: SegmentKind, mass: f64, length: f64, radius: f64) -> Self {
        SegmentSpec {
            kind,
            mass,
            length,
            radius,
        }
    }
}

/// Validate an ordered engine→capsule stack. Trusted configuration: checked
/// once at construction, construction fails fast on violation.
pub(crate) fn validate_stack(specs: &[SegmentSpec]) -> Result<(), SimError> {
    if specs.len() < 2 {
        return Err(SimError::InvalidConfig(
            "a craft needs at least two segments".into(),
        ));
    }
    for (i, spec) in specs.iter().enumerate() {
        if spec.mass <= 0.0 || spec.length <= 0.0 || spec.radius <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "segment {i} must have positive mass, length and radius"
            )));
        }
    }
    if specs.first().map(|s| s.kind) != Some(SegmentKind::Engine) {
        return Err(SimError::InvalidConfig(
            "the lowest segment must be an engine".into(),
        ));
    }
    if specs.last().map(|s| s.kind) != Some(SegmentKind::Capsule) {
        return Err(SimError::InvalidConfig(
            "the terminal segment must be the capsule".into(),
        ));
    }
    if specs[..specs.len() - 1]
        .iter()
        .any(|s| s.kind == SegmentKind::Capsule)
    {
        return Err(SimError::InvalidConfig(
            "only the terminal segment may be a capsule".into(),
        ));
    }
    if !specs.iter().any(|s| s.kind == SegmentKind::Decoupler) {
        return Err(SimError::InvalidConfig(
            "a staged craft needs at least one decoupler".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(kind: SegmentKind) -> SegmentSpec {
        SegmentSpec::new(kind, 10.0, 2.0, 1.5)
    }

    #[test]
    fn accepts_minimal_staged_stack() {
        let stack = [
            seg(SegmentKind::Engine),
            seg(SegmentKind::Decoupler),
            seg(SegmentKind::Capsule),
        ];
        assert!(validate_stack(&stack).is_ok());
    }

    #[test]
    fn rejects_capsule_first() {
        let stack = [seg(SegmentKind::Capsule), seg(SegmentKind::Engine)];
        assert!(validate_stack(&stack).is_err());
    }

    #[test]
    fn rejects_nonpositive_mass() {
        let mut bad = seg(SegmentKind::Decoupler);
        bad.mass = 0.0;
        let stack = [seg(SegmentKind::Engine), bad, seg(SegmentKind::Capsule)];
        assert!(validate_stack(&stack).is_err());
    }

    #[test]
    fn rejects_missing_decoupler() {
        let stack = [
            seg(SegmentKind::Engine),
            seg(SegmentKind::Tank),
            seg(SegmentKind::Capsule),
        ];
        assert!(validate_stack(&stack).is_err());
    }
}
