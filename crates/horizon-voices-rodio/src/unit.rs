//! Playback units backed by rodio spatial sinks.

use std::sync::Arc;

use glam::Vec3;
use horizon_voices::PlaybackUnit;
use parking_lot::Mutex;
use rodio::{OutputStreamHandle, Source, SpatialSink};
use tracing::trace;

use crate::LOG_TARGET;
use crate::clip::SoundData;
use crate::error::RodioError;

/// Where the listener is and how far apart its ears are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Listener {
    pub(crate) position: Vec3,
    pub(crate) ear_spacing: f32,
}

impl Listener {
    /// Left and right ear positions.
    pub(crate) fn ears(&self) -> ([f32; 3], [f32; 3]) {
        let offset = Vec3::X * (self.ear_spacing / 2.0);
        (
            (self.position - offset).to_array(),
            (self.position + offset).to_array(),
        )
    }

    /// Where the sink's emitter goes for a sound at `position`.
    ///
    /// rodio pans purely by emitter position, so partial spatial blends
    /// pull the emitter toward the listener; at 0 it sits between the ears.
    pub(crate) fn emitter(&self, position: Vec3, spatial_blend: f32) -> [f32; 3] {
        self.position.lerp(position, spatial_blend).to_array()
    }
}

/// One output channel on a rodio stream.
///
/// rodio sinks cannot be restarted once stopped, so every
/// [`start`](PlaybackUnit::start) opens a fresh sink. Parameters set while
/// idle are kept and applied to the next sink.
pub struct RodioUnit {
    stream: OutputStreamHandle,
    listener: Arc<Mutex<Listener>>,
    sink: Option<SpatialSink>,
    gain: f32,
    pitch: f32,
    spatial_blend: f32,
    position: Vec3,
}

impl RodioUnit {
    pub(crate) fn new(stream: OutputStreamHandle, listener: Arc<Mutex<Listener>>) -> Self {
        Self {
            stream,
            listener,
            sink: None,
            gain: 1.0,
            pitch: 1.0,
            spatial_blend: 0.0,
            position: Vec3::ZERO,
        }
    }

    fn refresh_position(&self) {
        let Some(sink) = &self.sink else {
            return;
        };
        let listener = *self.listener.lock();
        let (left, right) = listener.ears();
        sink.set_left_ear_position(left);
        sink.set_right_ear_position(right);
        sink.set_emitter_position(listener.emitter(self.position, self.spatial_blend));
    }
}

impl PlaybackUnit for RodioUnit {
    type Clip = SoundData;

    fn start(&mut self, clip: &SoundData, looping: bool) -> horizon_voices::Result<()> {
        self.stop();

        let listener = *self.listener.lock();
        let (left, right) = listener.ears();
        let emitter = listener.emitter(self.position, self.spatial_blend);
        let sink = SpatialSink::try_new(&self.stream, emitter, left, right)
            .map_err(RodioError::from)?;
        sink.set_volume(self.gain);
        sink.set_speed(self.pitch);

        let source = clip.decoder()?;
        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.play();

        trace!(target: LOG_TARGET, looping, bytes = clip.len(), "Sink started");
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn is_finished(&self) -> bool {
        self.sink.as_ref().is_none_or(SpatialSink::empty)
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(sink) = &self.sink {
            sink.set_volume(gain);
        }
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
        if let Some(sink) = &self.sink {
            sink.set_speed(pitch);
        }
    }

    fn set_spatial_blend(&mut self, blend: f32) {
        self.spatial_blend = blend;
        self.refresh_position();
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh_position();
    }
}

impl Drop for RodioUnit {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener() -> Listener {
        Listener {
            position: Vec3::new(1.0, 0.0, 0.0),
            ear_spacing: 0.2,
        }
    }

    #[test]
    fn test_ears_straddle_listener() {
        let (left, right) = listener().ears();
        assert!((left[0] - 0.9).abs() < 1e-6);
        assert!((right[0] - 1.1).abs() < 1e-6);
        assert_eq!(left[1], 0.0);
        assert_eq!(right[2], 0.0);
    }

    #[test]
    fn test_emitter_follows_spatial_blend() {
        let listener = listener();
        let source = Vec3::new(5.0, 0.0, 4.0);

        assert_eq!(listener.emitter(source, 0.0), [1.0, 0.0, 0.0]);
        assert_eq!(listener.emitter(source, 1.0), [5.0, 0.0, 4.0]);
        assert_eq!(listener.emitter(source, 0.5), [3.0, 0.0, 2.0]);
    }
}
