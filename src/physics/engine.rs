use rapier3d::prelude::*;

// ---------------------------------------------------------------------------
// Rigid-body world wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around the rapier rigid-body world.
///
/// The engine's broadphase, narrowphase, constraint solver and integrator are
/// a black box behind this struct: the simulation only adds bodies, colliders
/// and joints, applies forces, steps, and queries contact pairs. World
/// gravity is zero — the inverse-square model applies its own forces.
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub integration_parameters: IntegrationParameters,
    gravity: Vector<Real>,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        PhysicsWorld {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            integration_parameters: IntegrationParameters::default(),
            gravity: vector![0.0, 0.0, 0.0],
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Advance the world by one sub-step of length `dt`.
    pub fn step(&mut self, dt: f64) {
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Whether two colliders are touching in the current contact list.
    pub fn in_contact(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.narrow_phase
            .contact_pair(a, b)
            .map_or(false, |pair| pair.has_any_active_contact)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> &RigidBody {
        &self.bodies[handle]
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle]
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
