//! Host-facing traits: playback units, clips and follow targets.
//!
//! The pool never renders audio itself. Each voice owns one
//! [`PlaybackUnit`], a thin adapter over whatever output channel the host
//! engine provides, and only starts, stops and adjusts it.

use glam::Vec3;

use crate::error::Result;

/// Audio data that a [`PlaybackUnit`] knows how to play.
///
/// Clips are cheap to clone (typically an `Arc` around decoded or encoded
/// data).
pub trait Clip: Clone + Send + Sync + 'static {
    /// Returns `true` if the clip carries no audio data.
    ///
    /// Requests to play an empty clip are rejected with
    /// [`VoiceError::NullClip`](crate::VoiceError::NullClip).
    fn is_empty(&self) -> bool;
}

/// One host-provided audio output channel.
///
/// A unit plays at most one clip at a time. Parameter setters must take
/// effect immediately, whether or not a clip is playing, and persist across
/// `start` calls.
pub trait PlaybackUnit: Send + 'static {
    /// The clip type this unit plays.
    type Clip: Clip;

    /// Begin playing `clip` from the start.
    fn start(&mut self, clip: &Self::Clip, looping: bool) -> Result<()>;

    /// Stop playback immediately.
    fn stop(&mut self);

    /// Returns `true` once the unit is not producing sound: a non-looping
    /// clip reached its end, or playback was never started.
    fn is_finished(&self) -> bool;

    /// Set the output gain (already multiplied by the master volume).
    fn set_gain(&mut self, gain: f32);

    /// Set the playback pitch (1.0 = original).
    fn set_pitch(&mut self, pitch: f32);

    /// Set how much the unit is spatialized (0.0 = 2D, 1.0 = fully 3D).
    fn set_spatial_blend(&mut self, blend: f32);

    /// Move the unit to a world position.
    fn set_position(&mut self, position: Vec3);
}

/// Something whose world position a playback can follow.
///
/// [`position`](Self::position) is called once per tick while following,
/// with no voice locked, so it may read the pool or any playback handle.
pub trait PositionSource: Send + Sync {
    /// The current world position.
    fn position(&self) -> Vec3;
}

impl<F> PositionSource for F
where
    F: Fn() -> Vec3 + Send + Sync,
{
    fn position(&self) -> Vec3 {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_position_source() {
        let source = || Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(PositionSource::position(&source), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_shared_position_source_tracks_updates() {
        let target = std::sync::Arc::new(parking_lot::Mutex::new(Vec3::ZERO));
        let follow = {
            let target = target.clone();
            move || *target.lock()
        };
        assert_eq!(follow.position(), Vec3::ZERO);
        *target.lock() = Vec3::X;
        assert_eq!(follow.position(), Vec3::X);
    }
}
