//! A single reusable voice.
//!
//! A [`VoiceSlot`] owns one [`PlaybackUnit`] and runs at most one playback
//! at a time. The slot is idle exactly when it has no current handle.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use tracing::{debug, error, trace};

use crate::error::{Result, VoiceError};
use crate::handle::{HandleState, PlaybackId, Resolution, Settled, VoiceParams};
use crate::logging::targets;
use crate::pool::MasterVolume;
use crate::task::{FadeRamp, FollowTask, TaskKind, VoiceTask};
use crate::unit::{PlaybackUnit, PositionSource};

/// Lowest pitch forwarded to a unit.
pub(crate) const MIN_PITCH: f32 = 0.01;

/// One playback channel of a [`VoicePool`](crate::VoicePool).
pub(crate) struct VoiceSlot<U: PlaybackUnit> {
    index: usize,
    unit: U,
    current: Option<Arc<HandleState>>,
    generation: u64,
    base_volume: f32,
    pitch: f32,
    spatial_blend: f32,
    master: Arc<MasterVolume>,
    master_stamp: u64,
    tasks: Vec<VoiceTask>,
}

impl<U: PlaybackUnit> VoiceSlot<U> {
    pub(crate) fn new(index: usize, unit: U, master: Arc<MasterVolume>) -> Self {
        Self {
            index,
            unit,
            current: None,
            generation: 0,
            base_volume: 1.0,
            pitch: 1.0,
            spatial_blend: 0.0,
            master,
            master_stamp: 0,
            tasks: Vec::new(),
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    /// Whether `state` is the handle currently controlling this voice.
    pub(crate) fn is_current(&self, state: &Arc<HandleState>) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, state))
    }

    fn owns(&self, id: PlaybackId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|current| current.id() == id && current.is_active())
    }

    pub(crate) fn params(&self) -> VoiceParams {
        VoiceParams {
            volume: self.base_volume,
            pitch: self.pitch,
            spatial_blend: self.spatial_blend,
        }
    }

    /// Start playing `clip` on this voice and bind a new handle to it.
    ///
    /// The voice must be idle. If the unit fails to start, the voice stays
    /// idle and no handle is created.
    pub(crate) fn assign_and_play(
        &mut self,
        clip: &U::Clip,
        volume: f32,
        looping: bool,
        spatial_blend: f32,
    ) -> Result<Arc<HandleState>> {
        if !self.is_idle() {
            error!(
                target: targets::VOICE,
                slot = self.index,
                "Voice assigned while already playing"
            );
            debug_assert!(false, "voice {} assigned while already playing", self.index);
            return Err(VoiceError::SlotInvariantViolation { slot: self.index });
        }

        self.tasks.clear();
        // Defaults first, so a rejected non-finite argument falls back to them.
        self.set_pitch(1.0);
        self.set_spatial_blend(0.0);
        self.set_volume(1.0);
        self.set_spatial_blend(spatial_blend);
        self.set_volume(volume);

        if let Err(err) = self.unit.start(clip, looping) {
            error!(target: targets::VOICE, slot = self.index, "Failed to start playback: {err}");
            return Err(err);
        }

        self.generation += 1;
        let id = PlaybackId::new(self.index, self.generation);
        let state = HandleState::new(id, self.params());
        self.current = Some(state.clone());

        debug!(
            target: targets::VOICE,
            %id,
            volume = self.base_volume,
            looping,
            spatial_blend = self.spatial_blend,
            "Playback started"
        );
        Ok(state)
    }

    /// Stop the playback controlled by `requester`.
    ///
    /// Fails with [`VoiceError::StaleHandle`] if `requester` no longer
    /// controls this voice; the running playback is left untouched.
    pub(crate) fn request_stop(&mut self, requester: &Arc<HandleState>) -> Result<Settled> {
        if !self.is_current(requester) {
            return Err(VoiceError::StaleHandle {
                id: requester.id(),
            });
        }
        self.unit.stop();
        self.release(Resolution::Stopped)
            .ok_or(VoiceError::StaleHandle {
                id: requester.id(),
            })
    }

    /// Stop whatever is playing, if anything.
    pub(crate) fn stop_current(&mut self) -> Option<Settled> {
        if self.is_idle() {
            return None;
        }
        self.unit.stop();
        self.release(Resolution::Stopped)
    }

    /// Expire the current handle and return the voice to idle.
    fn release(&mut self, resolution: Resolution) -> Option<Settled> {
        let state = self.current.take()?;
        self.tasks.clear();
        state.expire(self.params());
        Some(Settled::new(state, resolution))
    }

    /// The follow target of the current playback, if it has one.
    ///
    /// The pool samples it with no voice locked and hands the result to
    /// [`update`](Self::update).
    pub(crate) fn follow_target(&self) -> Option<(PlaybackId, Arc<dyn PositionSource>)> {
        self.tasks.iter().find_map(|task| match &task.kind {
            TaskKind::Follow(follow) if self.owns(task.owner) => {
                Some((task.owner, follow.shared_target()))
            }
            _ => None,
        })
    }

    /// Advance the voice by one tick.
    ///
    /// `followed` is the follow target's position sampled for this tick,
    /// tagged with the playback that asked for it.
    pub(crate) fn update(
        &mut self,
        elapsed: f32,
        followed: Option<(PlaybackId, Vec3)>,
    ) -> Option<Settled> {
        if self.is_idle() {
            return None;
        }

        if self.unit.is_finished() {
            return self.release(Resolution::Finished);
        }

        if self.master_stamp < self.master.stamp() {
            self.apply_gain();
        }

        self.run_tasks(elapsed, followed)
    }

    fn run_tasks(&mut self, elapsed: f32, followed: Option<(PlaybackId, Vec3)>) -> Option<Settled> {
        if self.tasks.is_empty() {
            return None;
        }

        let mut tasks = std::mem::take(&mut self.tasks);
        let mut stop_requested = false;

        tasks.retain_mut(|task| {
            if stop_requested || !self.owns(task.owner) {
                return false;
            }
            match &mut task.kind {
                TaskKind::Fade(ramp) => {
                    let volume = ramp.advance(elapsed);
                    self.set_volume(volume);
                    trace!(target: targets::VOICE, id = %task.owner, volume, "Fade step");
                    if ramp.is_complete() {
                        stop_requested = ramp.stop_on_complete();
                        false
                    } else {
                        true
                    }
                }
                TaskKind::Follow(_) => {
                    if let Some((owner, position)) = followed {
                        if owner == task.owner {
                            self.unit.set_position(position);
                        }
                    }
                    true
                }
            }
        });

        self.tasks = tasks;

        if stop_requested {
            self.unit.stop();
            return self.release(Resolution::Stopped);
        }
        None
    }

    /// Schedule a volume ramp for the playback `owner`, replacing any ramp
    /// already running.
    ///
    /// `from` defaults to the current volume. Zero-length ramps are applied
    /// immediately, including the stop.
    pub(crate) fn start_fade(
        &mut self,
        owner: &Arc<HandleState>,
        from: Option<f32>,
        to: f32,
        duration: Duration,
        stop_after: bool,
    ) -> Option<Settled> {
        if !to.is_finite() {
            self.reject_non_finite("fade target", to);
            return None;
        }
        let from = from.unwrap_or(self.base_volume);
        let mut ramp = FadeRamp::new(from, to, duration, stop_after);
        self.tasks.retain(|task| !task.is_fade());

        // A zero-length step applies the start volume right away.
        let volume = ramp.advance(0.0);
        self.set_volume(volume);

        if ramp.is_complete() {
            if stop_after {
                self.unit.stop();
                return self.release(Resolution::Stopped);
            }
            return None;
        }

        self.tasks.push(VoiceTask::fade(owner.id(), ramp));
        None
    }

    /// Follow `target`, starting at `position` (sampled by the caller
    /// before locking the voice).
    pub(crate) fn start_follow(
        &mut self,
        owner: PlaybackId,
        target: Arc<dyn PositionSource>,
        position: Vec3,
    ) {
        self.tasks.retain(|task| !task.is_follow());
        self.set_spatial_blend(1.0);
        self.unit.set_position(position);
        self.tasks.push(VoiceTask::follow(owner, FollowTask::new(target)));
    }

    pub(crate) fn stop_follow(&mut self, owner: PlaybackId) {
        self.tasks
            .retain(|task| !(task.is_follow() && task.owner == owner));
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return self.reject_non_finite("volume", volume);
        }
        self.base_volume = volume.clamp(0.0, 1.0);
        self.apply_gain();
    }

    pub(crate) fn set_pitch(&mut self, pitch: f32) {
        if !pitch.is_finite() {
            return self.reject_non_finite("pitch", pitch);
        }
        self.pitch = pitch.max(MIN_PITCH);
        self.unit.set_pitch(self.pitch);
    }

    pub(crate) fn set_spatial_blend(&mut self, blend: f32) {
        if !blend.is_finite() {
            return self.reject_non_finite("spatial blend", blend);
        }
        self.spatial_blend = blend.clamp(0.0, 1.0);
        self.unit.set_spatial_blend(self.spatial_blend);
    }

    /// Non-finite parameters are usage errors; the previous value is kept.
    fn reject_non_finite(&self, parameter: &'static str, value: f32) {
        error!(
            target: targets::VOICE,
            slot = self.index,
            parameter,
            %value,
            "Ignoring non-finite parameter"
        );
    }

    pub(crate) fn place_at(&mut self, position: Vec3) {
        self.unit.set_position(position);
    }

    fn apply_gain(&mut self) {
        self.master_stamp = self.master.stamp();
        self.unit.set_gain(self.base_volume * self.master.volume());
    }
}
