//! Backend configuration.

use glam::Vec3;

use crate::error::{Result, RodioError};

/// Default distance between the listener's ears, in world units.
pub const DEFAULT_EAR_SPACING: f32 = 0.2;

/// Configuration for an [`AudioOutput`](crate::AudioOutput).
#[derive(Debug, Clone, PartialEq)]
pub struct RodioConfig {
    /// Distance between the left and right ear. The ears sit on the x axis
    /// on either side of the listener.
    pub ear_spacing: f32,
    /// Initial listener position.
    pub listener_position: Vec3,
}

impl Default for RodioConfig {
    fn default() -> Self {
        Self {
            ear_spacing: DEFAULT_EAR_SPACING,
            listener_position: Vec3::ZERO,
        }
    }
}

impl RodioConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ear spacing.
    pub fn ear_spacing(mut self, spacing: f32) -> Self {
        self.ear_spacing = spacing;
        self
    }

    /// Set the initial listener position.
    pub fn listener_position(mut self, position: Vec3) -> Self {
        self.listener_position = position;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.ear_spacing.is_finite() || self.ear_spacing <= 0.0 {
            return Err(RodioError::InvalidConfig(format!(
                "ear spacing {} must be positive",
                self.ear_spacing
            )));
        }
        if !self.listener_position.is_finite() {
            return Err(RodioError::InvalidConfig(
                "listener position must be finite".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RodioConfig::default();
        assert_eq!(config.ear_spacing, DEFAULT_EAR_SPACING);
        assert_eq!(config.listener_position, Vec3::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_ear_spacing() {
        assert!(RodioConfig::new().ear_spacing(0.0).validate().is_err());
        assert!(RodioConfig::new().ear_spacing(f32::NAN).validate().is_err());
        assert!(
            RodioConfig::new()
                .listener_position(Vec3::splat(f32::INFINITY))
                .validate()
                .is_err()
        );
    }
}
