//! Playback handles.
//!
//! A [`PlaybackHandle`] is returned for every successful play request. It is
//! the only way to adjust or stop the playback, and it is future-like: it
//! resolves exactly once, when the playback ends, and can run continuations
//! at that moment.
//!
//! Handles have two independent state machines:
//!
//! - **Liveness**: `Active -> Expired`. An expired handle no longer controls
//!   any voice. Every mutating call on it is a logged no-op, so a handle kept
//!   past the end of its sound can never disturb whatever the voice plays
//!   next.
//! - **Resolution**: `Pending -> Resolved(Resolution)`. Continuations
//!   registered with [`PlaybackHandle::on_resolved`] run exactly once.
//!
//! Chaining methods return `&Self`:
//!
//! ```ignore
//! pool.play_clip(&explosion)?
//!     .place_at(Vec3::new(4.0, 0.0, 2.0))
//!     .fade_out(Duration::from_secs(2), true);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use glam::Vec3;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::VoiceError;
use crate::logging::targets;
use crate::unit::{PlaybackUnit, PositionSource};
use crate::voice::VoiceSlot;

/// Identifies one playback: the voice index plus that voice's assignment
/// counter. Ids are never reused, even when a voice is recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackId {
    slot: usize,
    generation: u64,
}

impl PlaybackId {
    pub(crate) fn new(slot: usize, generation: u64) -> Self {
        Self { slot, generation }
    }

    /// Index of the voice serving this playback.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// How many times the voice had been assigned, including this playback.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.slot, self.generation)
    }
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The clip reached its end on its own.
    Finished,
    /// The playback was stopped explicitly or by a fade-out.
    Stopped,
}

/// Voice parameters as seen through a handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VoiceParams {
    pub(crate) volume: f32,
    pub(crate) pitch: f32,
    pub(crate) spatial_blend: f32,
}

type Continuation = Box<dyn FnOnce(Resolution) + Send>;

enum Completion {
    Pending(Vec<Continuation>),
    Resolved(Resolution),
}

/// State shared between a handle (and its clones) and the voice serving it.
pub(crate) struct HandleState {
    id: PlaybackId,
    active: AtomicBool,
    last_params: Mutex<VoiceParams>,
    completion: Mutex<Completion>,
}

impl HandleState {
    pub(crate) fn new(id: PlaybackId, params: VoiceParams) -> Arc<Self> {
        Arc::new(Self {
            id,
            active: AtomicBool::new(true),
            last_params: Mutex::new(params),
            completion: Mutex::new(Completion::Pending(Vec::new())),
        })
    }

    pub(crate) fn id(&self) -> PlaybackId {
        self.id
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Invalidate the handle, keeping the final parameters for getters.
    pub(crate) fn expire(&self, params: VoiceParams) {
        *self.last_params.lock() = params;
        self.active.store(false, Ordering::SeqCst);
    }

    fn last_params(&self) -> VoiceParams {
        *self.last_params.lock()
    }

    /// Mark the playback resolved and run pending continuations.
    ///
    /// Must be called without any voice lock held. A second call is ignored.
    fn resolve(&self, resolution: Resolution) {
        let continuations = {
            let mut completion = self.completion.lock();
            match std::mem::replace(&mut *completion, Completion::Resolved(resolution)) {
                Completion::Pending(pending) => pending,
                Completion::Resolved(first) => {
                    *completion = Completion::Resolved(first);
                    return;
                }
            }
        };

        for continuation in continuations {
            continuation(resolution);
        }
    }

    fn resolution(&self) -> Option<Resolution> {
        match &*self.completion.lock() {
            Completion::Pending(_) => None,
            Completion::Resolved(resolution) => Some(*resolution),
        }
    }

    fn on_resolved(&self, continuation: Continuation) {
        let resolution = {
            let mut completion = self.completion.lock();
            match &mut *completion {
                Completion::Pending(pending) => {
                    pending.push(continuation);
                    return;
                }
                Completion::Resolved(resolution) => *resolution,
            }
        };
        continuation(resolution);
    }
}

/// A playback that has ended on a voice but whose handle has not been
/// notified yet.
///
/// Voices hand these out while locked; the caller drops the lock and then
/// calls [`notify`](Self::notify), so continuations are free to start new
/// playbacks on any voice.
#[must_use = "the handle is only resolved once `notify` is called"]
pub(crate) struct Settled {
    state: Arc<HandleState>,
    resolution: Resolution,
}

impl Settled {
    pub(crate) fn new(state: Arc<HandleState>, resolution: Resolution) -> Self {
        Self { state, resolution }
    }

    pub(crate) fn notify(self) {
        debug!(
            target: targets::VOICE,
            id = %self.state.id,
            resolution = ?self.resolution,
            "Playback resolved"
        );
        self.state.resolve(self.resolution);
    }
}

/// Controller for one in-flight playback.
///
/// Cloning a handle yields another controller for the same playback.
pub struct PlaybackHandle<U: PlaybackUnit> {
    voice: Weak<Mutex<VoiceSlot<U>>>,
    state: Arc<HandleState>,
}

impl<U: PlaybackUnit> Clone for PlaybackHandle<U> {
    fn clone(&self) -> Self {
        Self {
            voice: self.voice.clone(),
            state: self.state.clone(),
        }
    }
}

impl<U: PlaybackUnit> fmt::Debug for PlaybackHandle<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("id", &self.state.id)
            .field("active", &self.state.is_active())
            .field("resolution", &self.state.resolution())
            .finish()
    }
}

impl<U: PlaybackUnit> PlaybackHandle<U> {
    pub(crate) fn new(voice: Weak<Mutex<VoiceSlot<U>>>, state: Arc<HandleState>) -> Self {
        Self { voice, state }
    }

    /// The id of the controlled playback.
    pub fn id(&self) -> PlaybackId {
        self.state.id
    }

    /// Whether the handle still controls its voice.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Whether the playback has ended.
    pub fn is_resolved(&self) -> bool {
        self.state.resolution().is_some()
    }

    /// How the playback ended, or `None` while it is still running.
    pub fn resolution(&self) -> Option<Resolution> {
        self.state.resolution()
    }

    /// Run `continuation` once the playback ends.
    ///
    /// Runs immediately if the playback has already ended. Continuations
    /// are invoked with no voice locked and may start new playbacks.
    pub fn on_resolved<F>(&self, continuation: F) -> &Self
    where
        F: FnOnce(Resolution) + Send + 'static,
    {
        self.state.on_resolved(Box::new(continuation));
        self
    }

    /// Current volume, before the master volume is applied.
    ///
    /// After expiry this is the last volume the playback had.
    pub fn volume(&self) -> f32 {
        self.read(|voice| voice.params().volume, |params| params.volume)
    }

    /// Current pitch.
    pub fn pitch(&self) -> f32 {
        self.read(|voice| voice.params().pitch, |params| params.pitch)
    }

    /// Current spatial blend.
    pub fn spatial_blend(&self) -> f32 {
        self.read(
            |voice| voice.params().spatial_blend,
            |params| params.spatial_blend,
        )
    }

    /// Set the volume (0.0 to 1.0). The master volume is applied on top.
    pub fn set_volume(&self, volume: f32) -> &Self {
        self.with_voice("set_volume", |voice| voice.set_volume(volume));
        self
    }

    /// Set the pitch (1.0 = original).
    pub fn set_pitch(&self, pitch: f32) -> &Self {
        self.with_voice("set_pitch", |voice| voice.set_pitch(pitch));
        self
    }

    /// Set the spatial blend (0.0 = 2D, 1.0 = fully 3D).
    pub fn set_spatial_blend(&self, blend: f32) -> &Self {
        self.with_voice("set_spatial_blend", |voice| {
            voice.set_spatial_blend(blend)
        });
        self
    }

    /// Stop the playback. The handle expires and resolves as
    /// [`Resolution::Stopped`].
    ///
    /// Calling this on an expired handle does nothing apart from a warning.
    pub fn stop(&self) {
        let voice = self.voice.upgrade().filter(|_| self.state.is_active());
        let result = match voice {
            Some(voice) => {
                let mut slot = voice.lock();
                slot.request_stop(&self.state)
            }
            None => Err(VoiceError::StaleHandle { id: self.state.id }),
        };
        match result {
            Ok(settled) => settled.notify(),
            Err(err) => {
                warn!(target: targets::HANDLE, id = %self.state.id, "Stop ignored: {err}");
            }
        }
    }

    /// Fade the volume to silence over `duration`.
    ///
    /// With `stop_after`, the playback is stopped once the fade completes,
    /// provided it is still running by then. A zero duration silences (and
    /// stops) immediately.
    pub fn fade_out(&self, duration: Duration, stop_after: bool) -> &Self {
        self.fade("fade_out", None, 0.0, duration, stop_after);
        self
    }

    /// Fade to silence over `duration`, then stop.
    pub fn fade_out_and_stop(&self, duration: Duration) -> &Self {
        self.fade_out(duration, true)
    }

    /// Fade in from silence to the current volume over `duration`.
    pub fn fade_in(&self, duration: Duration) -> &Self {
        let target = self.volume();
        self.fade_in_to(duration, target)
    }

    /// Fade in from silence to `target_volume` over `duration`.
    pub fn fade_in_to(&self, duration: Duration, target_volume: f32) -> &Self {
        self.fade("fade_in", Some(0.0), target_volume, duration, false);
        self
    }

    /// Move the playback to `position` with the given spatial blend.
    pub fn play_at(&self, position: Vec3, spatial_blend: f32) -> &Self {
        self.with_voice("play_at", |voice| {
            voice.set_spatial_blend(spatial_blend);
            voice.place_at(position);
        });
        self
    }

    /// Move the playback to `position` as a fully spatial sound.
    pub fn place_at(&self, position: Vec3) -> &Self {
        self.play_at(position, 1.0)
    }

    /// Keep the playback positioned on `target` every tick.
    ///
    /// Sets the spatial blend to 1 and replaces any previous follow target.
    /// Following ends with [`stop_follow`](Self::stop_follow) or when the
    /// playback ends.
    pub fn follow(&self, target: Arc<dyn PositionSource>) -> &Self {
        let id = self.state.id;
        let position = target.position();
        self.with_voice("follow", |voice| voice.start_follow(id, target, position));
        self
    }

    /// Stop following the current target. The playback stays where it is.
    pub fn stop_follow(&self) -> &Self {
        let id = self.state.id;
        self.with_voice("stop_follow", |voice| voice.stop_follow(id));
        self
    }

    fn fade(&self, op: &'static str, from: Option<f32>, to: f32, duration: Duration, stop: bool) {
        let Some(voice) = self.live_voice(op) else {
            return;
        };
        let settled = {
            let mut voice = voice.lock();
            if !voice.is_current(&self.state) {
                self.log_stale(op);
                return;
            }
            voice.start_fade(&self.state, from, to, duration, stop)
        };
        if let Some(settled) = settled {
            settled.notify();
        }
    }

    fn live_voice(&self, op: &'static str) -> Option<Arc<Mutex<VoiceSlot<U>>>> {
        if !self.state.is_active() {
            self.log_stale(op);
            return None;
        }
        let voice = self.voice.upgrade();
        if voice.is_none() {
            self.log_stale(op);
        }
        voice
    }

    fn with_voice<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut VoiceSlot<U>) -> R,
    ) -> Option<R> {
        let voice = self.live_voice(op)?;
        let mut guard = voice.lock();
        if !guard.is_current(&self.state) {
            self.log_stale(op);
            return None;
        }
        Some(f(&mut *guard))
    }

    fn read<R>(
        &self,
        live: impl FnOnce(&VoiceSlot<U>) -> R,
        expired: impl FnOnce(&VoiceParams) -> R,
    ) -> R {
        if self.state.is_active() {
            if let Some(voice) = self.voice.upgrade() {
                let guard = voice.lock();
                if guard.is_current(&self.state) {
                    return live(&*guard);
                }
            }
        }
        expired(&self.state.last_params())
    }

    fn log_stale(&self, op: &'static str) {
        debug!(
            target: targets::HANDLE,
            id = %self.state.id,
            op,
            "Ignoring operation on expired playback handle"
        );
    }
}
