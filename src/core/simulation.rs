use crate::bodies::{AgentController, Body};
use crate::collision::{collide_aabb, AabbContact, ContactKind, Manifold, NarrowPhase, PenetrationField, VoxelNarrowPhase};
use crate::core::storage::Storage;
use crate::core::{
    AgentHandle, AgentStorage, Allocator, BodyHandle, BodyStorage, ColliderId, SimulationConfig, SpaceConfig,
};
use crate::error::VoxelError;
use crate::math::{Direction, Vector3, EPSILON};
use crate::shapes::{Aabb, BoxShape, ImplicitPlane, Obb, Shape};
use crate::space::{RegionSample, Space, VoxelRef};
use crate::Result;

use log::{debug, trace, warn};

/// The voxel world, its bodies and agents, and the step that advances them.
///
/// Each call to [`simulate`](Simulation::simulate) runs one pass: every agent
/// in creation order, then every body in creation order. Corrections made
/// while processing one entry are visible to the entries after it.
pub struct Simulation {
    /// Pools backing the space's back-reference lists
    allocator: Allocator,

    /// The voxel world
    space: Space,

    /// All dynamic bodies, in processing order
    bodies: BodyStorage<Body>,

    /// All agent controllers, in processing order
    agents: AgentStorage<AgentController>,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// Box-box and box-plane tests
    narrow_phase: VoxelNarrowPhase,

    /// The total elapsed simulation time
    time: f32,
}

impl Simulation {
    /// Creates an empty simulation over an empty space
    pub fn new(config: SimulationConfig, space_config: SpaceConfig) -> Result<Self> {
        config.validate()?;
        let space = Space::new(space_config)?;

        Ok(Self {
            allocator: Allocator::with_capacity(config.pool_capacity),
            space,
            bodies: BodyStorage::new(),
            agents: AgentStorage::new(),
            narrow_phase: VoxelNarrowPhase::new(config.skin_width),
            config,
            time: 0.0,
        })
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Returns a reference to the simulation configuration
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sets the gravity applied to bodies and agents
    pub fn set_gravity(&mut self, gravity: Vector3) {
        self.config.gravity = gravity;
    }

    pub fn get_gravity(&self) -> Vector3 {
        self.config.gravity
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Mutable access to the voxel world.
    ///
    /// Colliders registered through the simulation must not be removed here.
    pub fn space_mut(&mut self) -> &mut Space {
        &mut self.space
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }

    pub fn narrow_phase(&self) -> &VoxelNarrowPhase {
        &self.narrow_phase
    }

    // === Bodies ===

    /// Adds a dynamic box body and registers it in the space
    pub fn create_aabb_body(&mut self, aabb: Aabb, mass: f32) -> Result<BodyHandle> {
        let body = Body::new(aabb.position(), aabb.half_extents(), mass)?;
        self.add_body(body)
    }

    /// Adds a dynamic body of any box shape
    pub fn create_body(&mut self, shape: BoxShape, mass: f32) -> Result<BodyHandle> {
        let body = Body::from_shape(shape, mass)?;
        self.add_body(body)
    }

    fn add_body(&mut self, body: Body) -> Result<BodyHandle> {
        let handle = self.bodies.add(body);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.attach(ColliderId::from(handle));
            let (collider, bounds) = body.collider_and_bounds();
            if let Err(err) = self.space.insert_collider(&mut self.allocator, collider, bounds) {
                self.remove_body(handle)?;
                return Err(err);
            }
            debug!("created {} at {}", handle, bounds.position());
        }
        Ok(handle)
    }

    /// Removes a body and unregisters it from every voxel
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let Some(mut body) = self.bodies.remove(handle) else {
            warn!("removing unknown {}", handle);
            return Err(VoxelError::BodyNotFound(handle));
        };
        self.space.remove_collider(&mut self.allocator, body.collider_mut());
        Ok(body)
    }

    /// Gets a reference to a body by its handle
    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get(handle).ok_or(VoxelError::BodyNotFound(handle))
    }

    /// Gets a mutable reference to a body by its handle.
    ///
    /// Moving the body here takes effect in the space on the next step.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_mut(handle).ok_or(VoxelError::BodyNotFound(handle))
    }

    /// Bodies in processing order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies.iter()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // === Agents ===

    /// Adds an agent controller
    pub fn create_agent_controller(&mut self, position: Vector3, half_extents: Vector3, speed: f32) -> Result<AgentHandle> {
        let agent = AgentController::new(position, half_extents, speed)?;
        let handle = self.agents.add(agent);
        debug!("created {} at {}", handle, position);
        Ok(handle)
    }

    pub fn remove_agent(&mut self, handle: AgentHandle) -> Result<AgentController> {
        self.agents.remove(handle).ok_or_else(|| {
            warn!("removing unknown {}", handle);
            VoxelError::AgentNotFound(handle)
        })
    }

    pub fn agent(&self, handle: AgentHandle) -> Result<&AgentController> {
        self.agents.get(handle).ok_or(VoxelError::AgentNotFound(handle))
    }

    pub fn agent_mut(&mut self, handle: AgentHandle) -> Result<&mut AgentController> {
        self.agents.get_mut(handle).ok_or(VoxelError::AgentNotFound(handle))
    }

    /// Agents in processing order
    pub fn agents(&self) -> impl Iterator<Item = (AgentHandle, &AgentController)> + '_ {
        self.agents.iter()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    // === Voxel editing ===

    /// Marks the voxel containing `position` solid
    pub fn set_voxel_occupied(&mut self, position: Vector3) -> bool {
        self.space.set_voxel_occupied(position)
    }

    /// Clears the voxel containing `position`
    pub fn set_voxel_unoccupied(&mut self, position: Vector3) -> bool {
        self.space.set_voxel_unoccupied(position)
    }

    /// Marks every voxel a box overlaps solid
    pub fn fill_region(&mut self, aabb: &Aabb) -> usize {
        self.space.fill_region(aabb)
    }

    /// Occupied voxels and registered bodies overlapping a box
    pub fn sample_region(&mut self, aabb: &Aabb) -> Result<RegionSample> {
        self.space.sample_occupied_region(&mut self.allocator, aabb)
    }

    // === Box against plane ===

    /// Contacts of a body against a bounded plane
    pub fn collide_body_plane(&self, handle: BodyHandle, plane: &ImplicitPlane) -> Result<Manifold> {
        let body = self.body(handle)?;
        Ok(self.narrow_phase.collide_box_plane(body.get_shape(), plane))
    }

    /// Settles a body onto a plane at its deepest FACE contact.
    ///
    /// The body becomes an oriented box aligned with the plane. EDGE contacts
    /// are reported in the returned manifold but not resolved.
    pub fn resolve_box_plane_face(&mut self, handle: BodyHandle, plane: &ImplicitPlane) -> Result<Manifold> {
        let body = self.bodies.get_mut(handle).ok_or(VoxelError::BodyNotFound(handle))?;
        let mut obb = match body.get_shape() {
            BoxShape::Obb(obb) => *obb,
            BoxShape::Aabb(aabb) => Obb::from_aabb(aabb),
        };

        let manifold = self.narrow_phase.collide_box_plane(&BoxShape::Obb(obb), plane);
        if let Some(contact) = manifold.deepest_of_kind(ContactKind::Face) {
            crate::collision::resolve_box_plane_face(&mut obb, plane, contact);
            *body.get_shape_mut() = BoxShape::Obb(obb);

            let (collider, bounds) = body.collider_and_bounds();
            self.space.update_collider(&mut self.allocator, collider, bounds)?;
        }
        Ok(manifold)
    }

    // === Stepping ===

    /// Advances the simulation by `dt`, clamped to the configured cap
    pub fn simulate(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        let dt = if dt > self.config.dt_cap {
            trace!("clamping dt {} to {}", dt, self.config.dt_cap);
            self.config.dt_cap
        } else {
            dt
        };

        self.simulate_agents(dt);
        self.simulate_bodies(dt);
        self.time += dt;
    }

    fn simulate_agents(&mut self, dt: f32) {
        let Self { allocator, space, bodies, agents, config, .. } = self;
        for (handle, agent) in agents.iter_mut() {
            if let Err(err) = update_agent(agent, bodies, space, allocator, config, dt) {
                warn!("{} skipped this step: {}", handle, err);
            }
        }
    }

    fn simulate_bodies(&mut self, dt: f32) {
        for handle in self.bodies.handles() {
            if let Err(err) = self.update_body(handle, dt) {
                warn!("{} skipped this step: {}", handle, err);
            }
        }
    }

    fn update_body(&mut self, handle: BodyHandle, dt: f32) -> Result<()> {
        let Self { allocator, space, bodies, config, .. } = self;

        let Some(body) = bodies.get_mut(handle) else {
            return Ok(());
        };
        if body.uses_gravity() && !body.is_sleeping() {
            body.add_force(config.gravity * body.get_mass());
        }
        body.integrate(dt);

        let (collider, bounds) = body.collider_and_bounds();
        space.update_collider(allocator, collider, bounds)?;
        let bounds = *bounds;

        let sample = space.sample_occupied_region(allocator, &bounds)?;
        let mut moved = false;

        for id in sample.colliders {
            let other = BodyHandle::from(id);
            if other == handle {
                continue;
            }
            let Some((body, other_body)) = bodies.pair_mut(handle, other) else {
                continue;
            };
            let Some(contact) = collide_aabb(body.get_shape(), other_body.get_shape()) else {
                continue;
            };

            resolve_body_contact(body, other_body, &contact, config);
            moved = true;

            let (collider, bounds) = other_body.collider_and_bounds();
            space.update_collider(allocator, collider, bounds)?;
        }

        let Some(body) = bodies.get_mut(handle) else {
            return Ok(());
        };
        let field = penetration_field(space, body.get_shape(), &sample.voxels);
        for (dir, depth) in field.entries() {
            trace!("{} pushed {} by {}", handle, dir, depth);
            resolve_voxel_contact(body, dir.to_vector(), depth, config);
            moved = true;
        }

        if moved {
            let (collider, bounds) = body.collider_and_bounds();
            space.update_collider(allocator, collider, bounds)?;
        }
        Ok(())
    }
}

/// Deepest voxel penetration per escape direction.
///
/// A voxel whose preferred escape leads into an occupied neighbour falls back
/// to its second direction; if that is blocked too the voxel is skipped.
fn penetration_field(space: &Space, shape: &dyn Shape, voxels: &[VoxelRef]) -> PenetrationField<VoxelRef> {
    let mut field = PenetrationField::new();
    for &voxel_ref in voxels {
        let Some(cell) = space.voxel(voxel_ref).map(|voxel| voxel.to_aabb()) else {
            continue;
        };
        let Some(contact) = collide_aabb(shape, &cell) else {
            continue;
        };

        let mut dir = contact.best();
        if space.is_neighbour_occupied(voxel_ref, dir) {
            dir = contact.second();
            if space.is_neighbour_occupied(voxel_ref, dir) {
                continue;
            }
        }
        field.insert(dir, shape.penetration_along_axis(&cell, dir), voxel_ref);
    }
    field
}

fn update_agent(
    agent: &mut AgentController,
    bodies: &BodyStorage<Body>,
    space: &Space,
    allocator: &mut Allocator,
    config: &SimulationConfig,
    dt: f32,
) -> Result<()> {
    agent.set_grounded(false);

    let body = agent.body_mut();
    body.add_force(config.gravity * body.get_mass());
    body.integrate(dt);

    let bounds = *agent.body().get_bounds();
    let sample = space.sample_occupied_region(allocator, &bounds)?;

    for id in sample.colliders {
        let Some(other) = bodies.get(BodyHandle::from(id)) else {
            continue;
        };
        let Some(contact) = collide_aabb(agent.body().get_shape(), other.get_shape()) else {
            continue;
        };
        agent.body_mut().translate(contact.resolution());
        if contact.best() == Direction::Up {
            agent.land();
        }
    }

    let field = penetration_field(space, agent.body().get_shape(), &sample.voxels);
    for (dir, depth) in field.entries() {
        agent.body_mut().translate(dir.to_vector() * depth);
    }
    if field.depth(Direction::Up) > 0.0 {
        agent.land();
    }
    Ok(())
}

/// Pushes a body out of solid voxels along `normal` and reflects its approach
fn resolve_voxel_contact(body: &mut Body, normal: Vector3, depth: f32, config: &SimulationConfig) {
    body.translate(normal * depth);

    let velocity = body.get_velocity();
    let mass = body.get_mass();
    let speed = velocity.length();

    let approach = velocity.dot(&normal);
    if approach < 0.0 {
        body.add_impulse(normal * (-(1.0 + body.get_restitution()) * mass * approach));
    }

    let tangential = velocity.tangential_component(&normal);
    let slide = tangential.length();
    if slide > EPSILON {
        let magnitude = (speed * mass * body.get_friction() * config.friction_factor).min(slide * mass);
        body.add_impulse(tangential.normalize() * -magnitude);
    }

    if speed < config.sleep_velocity_threshold && normal.y > 0.0 {
        put_to_sleep(body);
    }
}

/// Separates two overlapping bodies and exchanges momentum along the contact normal
fn resolve_body_contact(body: &mut Body, other: &mut Body, contact: &AabbContact, config: &SimulationConfig) {
    let normal = contact.best().to_vector();
    let half_depth = contact.penetration() * 0.5;
    body.translate(normal * half_depth);
    other.translate(normal * -half_depth);

    let relative = body.projected_velocity() - other.projected_velocity();
    let speed = relative.length();
    if speed < config.sleep_velocity_threshold {
        if normal.y > 0.0 {
            put_to_sleep(body);
        }
        return;
    }

    if other.is_sleeping() {
        other.set_sleeping(false);
        debug!("{} woken by {}", other.id(), body.id());
    }

    let approach = relative.dot(&normal);
    if approach >= 0.0 {
        return;
    }

    let reduced_mass = body.get_mass() * other.get_mass() / (body.get_mass() + other.get_mass());
    let impulse = normal * (-(1.0 + body.get_restitution()) * reduced_mass * approach);
    body.add_impulse(impulse);
    other.add_impulse(-impulse);

    let tangential = relative.tangential_component(&normal);
    let slide = tangential.length();
    if slide > EPSILON {
        let magnitude =
            (approach.abs() * reduced_mass * body.get_friction() * config.friction_factor).min(slide * reduced_mass);
        let friction = tangential.normalize() * -magnitude;
        body.add_impulse(friction);
        other.add_impulse(-friction);
    }
}

fn put_to_sleep(body: &mut Body) {
    if !body.is_sleeping() {
        debug!("{} fell asleep", body.id());
    }
    body.set_sleeping(true);
    body.set_velocity(Vector3::zero());
}
