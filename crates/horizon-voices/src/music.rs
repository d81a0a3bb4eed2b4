//! Music playback on top of a voice pool.
//!
//! A [`MusicPlayer`] keeps at most one looping music track alive. Starting a
//! new track fades the previous one out while the new one fades in, both over
//! [`MusicConfig::crossfade`].

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::MusicConfig;
use crate::error::{Result, VoiceError};
use crate::handle::PlaybackHandle;
use crate::logging::targets;
use crate::pool::VoicePool;
use crate::unit::PlaybackUnit;

/// Cross-fading music player.
///
/// The player borrows voices from a shared pool; during a cross-fade it
/// briefly occupies two.
///
/// # Example
///
/// ```ignore
/// let mut music = MusicPlayer::new(pool.clone(), MusicConfig::default())
///     .with_default_track(menu_theme);
///
/// music.begin_default()?;          // starts the menu theme
/// music.begin_music(&battle, true)?; // cross-fades to the battle track
/// music.end_music();                // fades the battle track out
/// ```
pub struct MusicPlayer<U: PlaybackUnit> {
    pool: Arc<VoicePool<U>>,
    config: MusicConfig,
    default_track: Option<U::Clip>,
    current: Option<PlaybackHandle<U>>,
}

impl<U: PlaybackUnit> MusicPlayer<U> {
    /// Create a music player that plays through `pool`.
    pub fn new(pool: Arc<VoicePool<U>>, config: MusicConfig) -> Self {
        Self {
            pool,
            config,
            default_track: None,
            current: None,
        }
    }

    /// Set the track played by [`begin_default`](Self::begin_default).
    pub fn with_default_track(mut self, track: U::Clip) -> Self {
        self.default_track = Some(track);
        self
    }

    /// Replace the default track.
    pub fn set_default_track(&mut self, track: Option<U::Clip>) {
        self.default_track = track;
    }

    /// The player configuration.
    pub fn config(&self) -> &MusicConfig {
        &self.config
    }

    /// Handle of the current track, if one was started and not ended.
    pub fn current(&self) -> Option<&PlaybackHandle<U>> {
        self.current.as_ref()
    }

    /// Whether a track is playing.
    pub fn is_playing(&self) -> bool {
        self.current.as_ref().is_some_and(PlaybackHandle::is_active)
    }

    /// Start looping `track`, ending the current track first.
    ///
    /// With `fade`, the new track fades in over the cross-fade duration.
    /// The previous track always fades out.
    pub fn begin_music(&mut self, track: &U::Clip, fade: bool) -> Result<()> {
        if self.current.is_some() {
            self.end_music();
        }

        let handle = self
            .pool
            .play(track, self.config.music_volume, true, 0.0)
            .inspect_err(|err| {
                if err.is_recoverable() {
                    warn!(target: targets::MUSIC, "Music not started: {err}");
                } else {
                    error!(target: targets::MUSIC, "Music failed to start: {err}");
                }
            })?;
        if fade {
            handle.fade_in(self.config.crossfade);
        }

        debug!(target: targets::MUSIC, id = %handle.id(), fade, "Music started");
        self.current = Some(handle);
        Ok(())
    }

    /// Start the default track.
    ///
    /// Fades in only when replacing a track that is already playing. Does
    /// nothing when the player is silenced.
    pub fn begin_default(&mut self) -> Result<()> {
        if self.config.silence {
            debug!(target: targets::MUSIC, "Music silenced, default track not started");
            return Ok(());
        }

        let Some(track) = self.default_track.clone() else {
            warn!(target: targets::MUSIC, "No default music track configured");
            return Err(VoiceError::NullClip);
        };

        let fade = self.current.is_some();
        self.begin_music(&track, fade)
    }

    /// Fade the current track out and stop it.
    pub fn end_music(&mut self) {
        match self.current.take() {
            Some(handle) => {
                debug!(target: targets::MUSIC, id = %handle.id(), "Music ending");
                handle.fade_out(self.config.crossfade, true);
            }
            None => debug!(target: targets::MUSIC, "No music to end"),
        }
    }
}
