use crate::bodies::{BodyFlags, Material};
use crate::core::ColliderId;
use crate::error::VoxelError;
use crate::math::Vector3;
use crate::shapes::{Aabb, BoxShape, Shape};
use crate::space::Collider;
use crate::Result;

/// A box-shaped dynamic body.
///
/// Forces and impulses queue up between steps. On integration the force
/// queue drains first (`velocity += force·dt/mass`), then the impulse queue
/// (`velocity += impulse/mass`), and the body moves by `velocity·dt`.
#[derive(Debug)]
pub struct Body {
    /// The body's collision shape
    shape: BoxShape,

    /// Registration of the shape's bounds in the voxel space
    collider: Collider,

    /// The body's mass
    mass: f32,

    /// The body's linear velocity
    velocity: Vector3,

    /// Forces to be applied in the next integration step
    forces: Vec<Vector3>,

    /// Momentum changes to be applied in the next integration step
    impulses: Vec<Vector3>,

    /// The body's material properties
    material: Material,

    /// The body's flags
    flags: BodyFlags,
}

impl Body {
    /// Creates an axis-aligned box body
    pub fn new(position: Vector3, half_extents: Vector3, mass: f32) -> Result<Self> {
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 || half_extents.z <= 0.0 {
            return Err(VoxelError::InvalidParameter(format!(
                "half extents must be positive, got {}",
                half_extents
            )));
        }
        Self::from_shape(BoxShape::Aabb(Aabb::new(position, half_extents)), mass)
    }

    /// Creates a body from any box shape
    pub fn from_shape(shape: BoxShape, mass: f32) -> Result<Self> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(VoxelError::InvalidParameter(format!("mass must be positive, got {}", mass)));
        }

        Ok(Self {
            shape,
            collider: Collider::new(ColliderId::default()),
            mass,
            velocity: Vector3::zero(),
            forces: Vec::new(),
            impulses: Vec::new(),
            material: Material::default(),
            flags: BodyFlags::USE_GRAVITY,
        })
    }

    /// Returns the body's collision shape
    pub fn get_shape(&self) -> &BoxShape {
        &self.shape
    }

    /// Returns the body's collision shape for modification
    pub fn get_shape_mut(&mut self) -> &mut BoxShape {
        &mut self.shape
    }

    /// World-aligned bounds used for voxel and box-box tests
    pub fn get_bounds(&self) -> &Aabb {
        self.shape.bounds()
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector3 {
        self.shape.position()
    }

    /// Moves the body's center to `position`
    pub fn set_position(&mut self, position: Vector3) {
        self.shape.set_position(position);
    }

    /// Moves the body by `translation`
    pub fn translate(&mut self, translation: Vector3) {
        self.shape.translate(translation);
    }

    pub fn get_half_extents(&self) -> Vector3 {
        self.shape.get_half_extents()
    }

    /// Returns the body's linear velocity
    pub fn get_velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Sets the body's linear velocity
    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Velocity after the queued impulses are applied
    pub fn projected_velocity(&self) -> Vector3 {
        self.impulses
            .iter()
            .fold(self.velocity, |v, impulse| v + *impulse / self.mass)
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass
    pub fn set_mass(&mut self, mass: f32) -> Result<()> {
        if !(mass > 0.0) || !mass.is_finite() {
            return Err(VoxelError::InvalidParameter(format!("mass must be positive, got {}", mass)));
        }
        self.mass = mass;
        Ok(())
    }

    /// Returns the body's material
    pub fn get_material(&self) -> Material {
        self.material
    }

    /// Sets the body's material
    pub fn set_material(&mut self, material: Material) -> Result<()> {
        material.validate()?;
        self.material = material;
        Ok(())
    }

    #[inline]
    pub fn get_restitution(&self) -> f32 {
        self.material.restitution
    }

    #[inline]
    pub fn get_friction(&self) -> f32 {
        self.material.friction
    }

    /// Returns the body's flags
    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.flags.contains(BodyFlags::SLEEPING)
    }

    /// Puts the body to sleep or wakes it. Sleeping drops every queued force and impulse.
    pub fn set_sleeping(&mut self, sleeping: bool) {
        self.flags.set(BodyFlags::SLEEPING, sleeping);
        if sleeping {
            self.clear_forces();
        }
    }

    #[inline]
    pub fn uses_gravity(&self) -> bool {
        self.flags.contains(BodyFlags::USE_GRAVITY)
    }

    pub fn set_use_gravity(&mut self, use_gravity: bool) {
        self.flags.set(BodyFlags::USE_GRAVITY, use_gravity);
    }

    /// Identity of the body in the voxel space
    #[inline]
    pub fn id(&self) -> ColliderId {
        self.collider.id()
    }

    /// The body's voxel registration
    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    pub(crate) fn collider_mut(&mut self) -> &mut Collider {
        &mut self.collider
    }

    pub(crate) fn attach(&mut self, id: ColliderId) {
        self.collider = Collider::new(id);
    }

    /// Split borrow of the registration and the bounds it indexes
    pub(crate) fn collider_and_bounds(&mut self) -> (&mut Collider, &Aabb) {
        (&mut self.collider, self.shape.bounds())
    }

    /// Queues a force for the next step
    pub fn add_force(&mut self, force: Vector3) {
        if !self.is_sleeping() {
            self.forces.push(force);
        }
    }

    /// Queues a momentum change for the next step
    pub fn add_impulse(&mut self, impulse: Vector3) {
        if !self.is_sleeping() {
            self.impulses.push(impulse);
        }
    }

    /// Drops every queued force and impulse
    pub fn clear_forces(&mut self) {
        self.forces.clear();
        self.impulses.clear();
    }

    /// Forces queued for the next step
    pub fn pending_forces(&self) -> &[Vector3] {
        &self.forces
    }

    /// Impulses queued for the next step
    pub fn pending_impulses(&self) -> &[Vector3] {
        &self.impulses
    }

    /// Drains the queues into the velocity and moves the body. Sleeping bodies stay put.
    pub fn integrate(&mut self, dt: f32) {
        if self.is_sleeping() {
            return;
        }

        let inv_mass = 1.0 / self.mass;
        for force in self.forces.drain(..) {
            self.velocity += force * (dt * inv_mass);
        }
        for impulse in self.impulses.drain(..) {
            self.velocity += impulse * inv_mass;
        }

        let step = self.velocity * dt;
        self.translate(step);
    }
}
