//! Configuration for voice pools and the music player.

use std::time::Duration;

use crate::error::{Result, VoiceError};

/// Default number of simultaneous voices.
pub const DEFAULT_CAPACITY: usize = 5;

/// Upper bound on the number of voices a pool may own.
pub const MAX_CAPACITY: usize = 30;

/// Default volume for music tracks.
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.5;

/// Default cross-fade duration between music tracks.
pub const DEFAULT_CROSSFADE: Duration = Duration::from_secs(3);

/// Configuration for a [`VoicePool`](crate::VoicePool).
///
/// # Example
///
/// ```
/// use horizon_voices::PoolConfig;
///
/// let config = PoolConfig::new().capacity(8).master_volume(0.75);
/// assert_eq!(config.capacity, 8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Maximum number of simultaneous sounds. Fixed for the pool's lifetime.
    pub capacity: usize,
    /// Master volume applied when the pool is created.
    pub master_volume: f32,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            master_volume: 1.0,
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of voices.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the initial master volume.
    pub fn master_volume(mut self, volume: f32) -> Self {
        self.master_volume = volume;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.capacity > MAX_CAPACITY {
            return Err(VoiceError::InvalidConfig(format!(
                "capacity {} exceeds the maximum of {MAX_CAPACITY}",
                self.capacity
            )));
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(VoiceError::InvalidConfig(format!(
                "master volume {} is outside [0, 1]",
                self.master_volume
            )));
        }
        Ok(())
    }
}

/// Configuration for a [`MusicPlayer`](crate::MusicPlayer).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MusicConfig {
    /// Base volume of music tracks.
    pub music_volume: f32,
    /// Fade duration used both for fading the old track out and the new one in.
    pub crossfade: Duration,
    /// When set, `begin_default` does nothing. Useful for editors and tests.
    pub silence: bool,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            music_volume: DEFAULT_MUSIC_VOLUME,
            crossfade: DEFAULT_CROSSFADE,
            silence: false,
        }
    }
}

impl MusicConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the music volume.
    pub fn music_volume(mut self, volume: f32) -> Self {
        self.music_volume = volume;
        self
    }

    /// Set the cross-fade duration.
    pub fn crossfade(mut self, duration: Duration) -> Self {
        self.crossfade = duration;
        self
    }

    /// Silence the default track.
    pub fn silence(mut self, silence: bool) -> Self {
        self.silence = silence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.master_volume, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pool_config_rejects_oversized_capacity() {
        let config = PoolConfig::new().capacity(MAX_CAPACITY + 1);
        assert!(matches!(
            config.validate(),
            Err(VoiceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_pool_config_rejects_bad_master_volume() {
        assert!(PoolConfig::new().master_volume(1.5).validate().is_err());
        assert!(PoolConfig::new().master_volume(-0.1).validate().is_err());
        assert!(PoolConfig::new().master_volume(0.0).validate().is_ok());
    }

    #[test]
    fn test_music_config_builder() {
        let config = MusicConfig::new()
            .music_volume(0.8)
            .crossfade(Duration::from_millis(500))
            .silence(true);
        assert_eq!(config.music_volume, 0.8);
        assert_eq!(config.crossfade, Duration::from_millis(500));
        assert!(config.silence);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_pool_config_partial_json() {
        let config: PoolConfig = serde_json::from_str(r#"{ "capacity": 12 }"#).unwrap();
        assert_eq!(config.capacity, 12);
        assert_eq!(config.master_volume, 1.0);
    }
}
