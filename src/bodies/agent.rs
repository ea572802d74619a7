use crate::bodies::Body;
use crate::math::Vector3;
use crate::Result;

/// A kinematically moved box, such as a player.
///
/// Horizontal motion translates the box directly; the vertical axis is
/// driven by gravity and jumps. Agents are resolved against the voxel world
/// and against bodies, but bodies never collide with agents.
#[derive(Debug)]
pub struct AgentController {
    body: Body,
    speed: f32,
    grounded: bool,
}

impl AgentController {
    /// Creates an agent of unit mass
    pub fn new(position: Vector3, half_extents: Vector3, speed: f32) -> Result<Self> {
        Ok(Self {
            body: Body::new(position, half_extents, 1.0)?,
            speed,
            grounded: false,
        })
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn get_position(&self) -> Vector3 {
        self.body.get_position()
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.body.set_position(position);
    }

    pub fn get_velocity(&self) -> Vector3 {
        self.body.get_velocity()
    }

    pub fn get_speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Whether the agent stood on something at the end of the last step
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub(crate) fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
    }

    /// Translates by `direction · dt · speed`
    pub fn move_by(&mut self, direction: Vector3, dt: f32) {
        self.body.translate(direction * (dt * self.speed));
    }

    /// Queues an upward impulse if grounded. Returns whether the jump happened.
    pub fn jump(&mut self, force: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.body.add_impulse(Vector3::up() * force);
        self.grounded = false;
        true
    }

    /// Cancels vertical motion and marks the agent as standing
    pub(crate) fn land(&mut self) {
        let mut velocity = self.body.get_velocity();
        velocity.y = 0.0;
        self.body.set_velocity(velocity);
        self.grounded = true;
    }
}
