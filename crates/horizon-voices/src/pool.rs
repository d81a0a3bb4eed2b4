//! The voice pool.
//!
//! A [`VoicePool`] owns a fixed number of voices and hands one out per play
//! request. Voices are scanned in index order, so the same sequence of
//! requests always lands on the same voices.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use horizon_voices::{PoolConfig, VoicePool};
//!
//! let pool = Arc::new(VoicePool::new(PoolConfig::default(), |_| make_unit())?);
//!
//! let handle = pool.play_clip(&footstep)?;
//! handle.set_pitch(1.2);
//!
//! // Once per frame:
//! pool.update(frame_delta);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use glam::Vec3;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::config::PoolConfig;
use crate::error::{Result, VoiceError};
use crate::handle::PlaybackHandle;
use crate::logging::targets;
use crate::unit::{Clip, PlaybackUnit};
use crate::voice::VoiceSlot;

/// The pool-wide volume multiplier together with a change counter.
///
/// Voices remember the stamp they last applied and refresh their gain when
/// the pool's stamp has moved on.
pub(crate) struct MasterVolume {
    bits: AtomicU32,
    stamp: AtomicU64,
}

impl MasterVolume {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            bits: AtomicU32::new(volume.to_bits()),
            stamp: AtomicU64::new(0),
        }
    }

    pub(crate) fn volume(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::SeqCst))
    }

    pub(crate) fn stamp(&self) -> u64 {
        self.stamp.load(Ordering::SeqCst)
    }

    pub(crate) fn set(&self, volume: f32) {
        self.bits.store(volume.to_bits(), Ordering::SeqCst);
        self.stamp.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fixed-size pool of playback voices.
///
/// All methods take `&self`, so a pool is usually shared as
/// `Arc<VoicePool<U>>` between gameplay code, the music player and the
/// system that calls [`update`](Self::update) every tick.
pub struct VoicePool<U: PlaybackUnit> {
    voices: Vec<Arc<Mutex<VoiceSlot<U>>>>,
    master: Arc<MasterVolume>,
}

impl<U: PlaybackUnit> VoicePool<U> {
    /// Create a pool with `config.capacity` voices, building each unit with
    /// `factory(index)`.
    pub fn new<F>(config: PoolConfig, mut factory: F) -> Result<Self>
    where
        F: FnMut(usize) -> Result<U>,
    {
        config.validate()?;
        let units = (0..config.capacity)
            .map(&mut factory)
            .collect::<Result<Vec<_>>>()?;
        let pool = Self::from_units(units)?;
        pool.master.set(config.master_volume);
        Ok(pool)
    }

    /// Create a pool from pre-built units. The pool's capacity is the
    /// number of units.
    pub fn from_units(units: Vec<U>) -> Result<Self> {
        PoolConfig::new().capacity(units.len()).validate()?;

        let master = Arc::new(MasterVolume::new(1.0));
        let voices = units
            .into_iter()
            .enumerate()
            .map(|(index, unit)| Arc::new(Mutex::new(VoiceSlot::new(index, unit, master.clone()))))
            .collect::<Vec<_>>();

        debug!(target: targets::POOL, capacity = voices.len(), "Voice pool created");

        Ok(Self { voices, master })
    }

    /// Number of voices in the pool.
    pub fn capacity(&self) -> usize {
        self.voices.len()
    }

    /// Number of voices currently playing.
    pub fn active_count(&self) -> usize {
        self.voices
            .iter()
            .filter(|voice| !voice.lock().is_idle())
            .count()
    }

    /// Whether the voice at `index` is playing. Out-of-range indices are
    /// reported as idle.
    pub fn is_slot_busy(&self, index: usize) -> bool {
        self.voices
            .get(index)
            .is_some_and(|voice| !voice.lock().is_idle())
    }

    /// Play `clip` on the first idle voice.
    ///
    /// # Arguments
    ///
    /// * `clip` - The clip to play
    /// * `volume` - Volume before the master volume is applied (0.0 to 1.0)
    /// * `looping` - Repeat until stopped
    /// * `spatial_blend` - 0.0 for 2D, 1.0 for fully positional
    ///
    /// # Errors
    ///
    /// - [`VoiceError::NullClip`] if the clip is empty
    /// - [`VoiceError::NoAvailableVoice`] if every voice is busy
    /// - [`VoiceError::Backend`] if the unit fails to start
    pub fn play(
        &self,
        clip: &U::Clip,
        volume: f32,
        looping: bool,
        spatial_blend: f32,
    ) -> Result<PlaybackHandle<U>> {
        if clip.is_empty() {
            error!(target: targets::POOL, "Requested playback of an empty clip");
            return Err(VoiceError::NullClip);
        }

        for voice in &self.voices {
            let mut slot = voice.lock();
            if !slot.is_idle() {
                continue;
            }
            let state = slot.assign_and_play(clip, volume, looping, spatial_blend)?;
            return Ok(PlaybackHandle::new(Arc::downgrade(voice), state));
        }

        warn!(
            target: targets::POOL,
            capacity = self.voices.len(),
            "No available voices"
        );
        Err(VoiceError::NoAvailableVoice {
            capacity: self.voices.len(),
        })
    }

    /// Play `clip` once at `volume`, non-spatial.
    pub fn play_with_volume(&self, clip: &U::Clip, volume: f32) -> Result<PlaybackHandle<U>> {
        self.play(clip, volume, false, 0.0)
    }

    /// Play `clip` once at full volume, non-spatial.
    pub fn play_clip(&self, clip: &U::Clip) -> Result<PlaybackHandle<U>> {
        self.play_with_volume(clip, 1.0)
    }

    /// Play `clip` once as a fully spatial sound at `position`.
    pub fn play_at(&self, clip: &U::Clip, position: Vec3) -> Result<PlaybackHandle<U>> {
        let handle = self.play(clip, 1.0, false, 1.0)?;
        handle.place_at(position);
        Ok(handle)
    }

    /// Play `clip` in a loop at full volume, non-spatial.
    pub fn play_loop(&self, clip: &U::Clip) -> Result<PlaybackHandle<U>> {
        self.play(clip, 1.0, true, 0.0)
    }

    /// Set the master volume (clamped to 0.0 to 1.0).
    ///
    /// Playing voices pick up the new value on the next [`update`](Self::update);
    /// new playbacks use it immediately.
    /// Non-finite values are rejected and leave the master volume unchanged.
    pub fn set_master_volume(&self, volume: f32) {
        if !volume.is_finite() {
            error!(target: targets::POOL, %volume, "Ignoring non-finite master volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.master.set(volume);
        debug!(target: targets::POOL, volume, "Master volume changed");
    }

    /// The current master volume.
    pub fn master_volume(&self) -> f32 {
        self.master.volume()
    }

    /// Advance every voice by one tick.
    ///
    /// Call once per frame with the time since the previous call. Voices are
    /// visited in index order; each one detects natural completion, applies
    /// master volume changes and steps its fades and follows. Continuations
    /// of playbacks that ended during this tick run before `update` returns.
    pub fn update(&self, delta: Duration) {
        let elapsed = delta.as_secs_f32();
        for voice in &self.voices {
            // Follow targets are sampled unlocked; they may query the pool.
            let target = voice.lock().follow_target();
            let followed = target.map(|(owner, source)| (owner, source.position()));
            let settled = voice.lock().update(elapsed, followed);
            if let Some(settled) = settled {
                settled.notify();
            }
        }
    }

    /// Stop every playing voice.
    pub fn stop_all(&self) {
        for voice in &self.voices {
            let settled = voice.lock().stop_current();
            if let Some(settled) = settled {
                settled.notify();
            }
        }
    }
}

impl<U: PlaybackUnit> Drop for VoicePool<U> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl<U: PlaybackUnit> fmt::Debug for VoicePool<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoicePool")
            .field("capacity", &self.capacity())
            .field("active", &self.active_count())
            .field("master_volume", &self.master_volume())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_volume_stamp_advances() {
        let master = MasterVolume::new(1.0);
        assert_eq!(master.stamp(), 0);
        assert_eq!(master.volume(), 1.0);

        master.set(0.5);
        master.set(0.5);
        assert_eq!(master.stamp(), 2);
        assert_eq!(master.volume(), 0.5);
    }
}
