use crate::error::VoxelError;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Surface response of a body
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Material {
    /// Coefficient of restitution (bounciness), 0-1
    pub restitution: f32,

    /// Coefficient of friction, 0-1
    pub friction: f32,
}

impl Material {
    /// Creates a new material with the specified properties
    pub fn new(restitution: f32, friction: f32) -> Self {
        Self { restitution, friction }
    }

    /// Checks that both coefficients lie in [0, 1]
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(VoxelError::InvalidParameter(format!(
                "restitution must lie in [0, 1], got {}",
                self.restitution
            )));
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(VoxelError::InvalidParameter(format!(
                "friction must lie in [0, 1], got {}",
                self.friction
            )));
        }
        Ok(())
    }

    /// Creates a material for ice (low friction, medium restitution)
    pub fn ice() -> Self {
        Self::new(0.4, 0.05)
    }

    /// Creates a material for rubber (high friction, high restitution)
    pub fn rubber() -> Self {
        Self::new(0.7, 0.8)
    }

    /// Creates a material for wood (medium friction, low restitution)
    pub fn wood() -> Self {
        Self::new(0.2, 0.6)
    }

    /// Creates a material for metal (medium friction, medium restitution)
    pub fn metal() -> Self {
        Self::new(0.5, 0.4)
    }

    /// Creates a material for stone (high friction, low restitution)
    pub fn stone() -> Self {
        Self::new(0.1, 0.9)
    }

    /// Perfectly elastic and frictionless
    pub fn elastic() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Perfectly inelastic and frictionless
    pub fn inelastic() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.5,
            friction: 0.5,
        }
    }
}
