//! Per-tick tasks attached to a voice.
//!
//! Fades and position-follows are explicit step functions: each holds its
//! own state and is advanced once per [`VoicePool::update`](crate::VoicePool::update)
//! until it completes. A task belongs to one playback and is dropped the
//! moment that playback ends.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::handle::PlaybackId;
use crate::unit::PositionSource;

/// A linear volume ramp.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FadeRamp {
    from: f32,
    to: f32,
    duration: f32,
    remaining: f32,
    stop_on_complete: bool,
}

impl FadeRamp {
    pub(crate) fn new(from: f32, to: f32, duration: Duration, stop_on_complete: bool) -> Self {
        let duration = duration.as_secs_f32();
        Self {
            from,
            to,
            duration,
            remaining: duration,
            stop_on_complete,
        }
    }

    /// Advance the ramp by `elapsed` seconds and return the volume to apply.
    pub(crate) fn advance(&mut self, elapsed: f32) -> f32 {
        self.remaining = (self.remaining - elapsed).max(0.0);
        // Zero-length ramps jump straight to the target.
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = 1.0 - self.remaining / self.duration;
        self.from + (self.to - self.from) * t
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.remaining <= 0.0
    }

    pub(crate) fn stop_on_complete(&self) -> bool {
        self.stop_on_complete
    }
}

/// Keeps a voice positioned on a moving target.
#[derive(Clone)]
pub(crate) struct FollowTask {
    target: Arc<dyn PositionSource>,
}

impl FollowTask {
    pub(crate) fn new(target: Arc<dyn PositionSource>) -> Self {
        Self { target }
    }

    pub(crate) fn shared_target(&self) -> Arc<dyn PositionSource> {
        self.target.clone()
    }
}

impl fmt::Debug for FollowTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FollowTask")
            .field("position", &self.target.position())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum TaskKind {
    Fade(FadeRamp),
    Follow(FollowTask),
}

/// A task together with the playback that scheduled it.
#[derive(Debug, Clone)]
pub(crate) struct VoiceTask {
    pub(crate) owner: PlaybackId,
    pub(crate) kind: TaskKind,
}

impl VoiceTask {
    pub(crate) fn fade(owner: PlaybackId, ramp: FadeRamp) -> Self {
        Self {
            owner,
            kind: TaskKind::Fade(ramp),
        }
    }

    pub(crate) fn follow(owner: PlaybackId, follow: FollowTask) -> Self {
        Self {
            owner,
            kind: TaskKind::Follow(follow),
        }
    }

    pub(crate) fn is_fade(&self) -> bool {
        matches!(self.kind, TaskKind::Fade(_))
    }

    pub(crate) fn is_follow(&self) -> bool {
        matches!(self.kind, TaskKind::Follow(_))
    }
}
