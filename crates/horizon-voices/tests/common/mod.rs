//! Scripted in-memory playback unit shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use horizon_voices::{Clip, PlaybackUnit, PoolConfig, Result, Vec3, VoiceError, VoicePool};
use parking_lot::Mutex;

/// Clip identified by name. An empty name is an empty clip.
#[derive(Debug, Clone, PartialEq)]
pub struct TestClip(pub &'static str);

impl Clip for TestClip {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a test may want to observe about one unit.
#[derive(Debug, Clone)]
pub struct UnitProbe {
    pub playing: bool,
    pub looping: bool,
    pub clip: Option<&'static str>,
    pub gain: f32,
    pub pitch: f32,
    pub spatial_blend: f32,
    pub position: Vec3,
    pub starts: usize,
    pub stops: usize,
    pub fail_start: bool,
}

impl Default for UnitProbe {
    fn default() -> Self {
        Self {
            playing: false,
            looping: false,
            clip: None,
            gain: 1.0,
            pitch: 1.0,
            spatial_blend: 0.0,
            position: Vec3::ZERO,
            starts: 0,
            stops: 0,
            fail_start: false,
        }
    }
}

pub type Probe = Arc<Mutex<UnitProbe>>;

/// A unit that records every call into a shared probe.
pub struct ScriptedUnit {
    probe: Probe,
}

impl ScriptedUnit {
    pub fn new() -> (Self, Probe) {
        let probe = Arc::new(Mutex::new(UnitProbe::default()));
        (
            Self {
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl PlaybackUnit for ScriptedUnit {
    type Clip = TestClip;

    fn start(&mut self, clip: &TestClip, looping: bool) -> Result<()> {
        let mut probe = self.probe.lock();
        if probe.fail_start {
            return Err(VoiceError::backend("scripted start failure"));
        }
        probe.playing = true;
        probe.looping = looping;
        probe.clip = Some(clip.0);
        probe.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        let mut probe = self.probe.lock();
        probe.playing = false;
        probe.stops += 1;
    }

    fn is_finished(&self) -> bool {
        !self.probe.lock().playing
    }

    fn set_gain(&mut self, gain: f32) {
        self.probe.lock().gain = gain;
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.probe.lock().pitch = pitch;
    }

    fn set_spatial_blend(&mut self, blend: f32) {
        self.probe.lock().spatial_blend = blend;
    }

    fn set_position(&mut self, position: Vec3) {
        self.probe.lock().position = position;
    }
}

/// Route every log record, down to per-tick traces, to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Collects formatted log output so tests can check levels and messages.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// A subscriber that writes every record, without colors, into this
    /// capture.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let writer = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Build a pool of `capacity` scripted units and return their probes.
pub fn scripted_pool(capacity: usize) -> (Arc<VoicePool<ScriptedUnit>>, Vec<Probe>) {
    init_tracing();
    let mut probes = Vec::new();
    let pool = VoicePool::new(PoolConfig::new().capacity(capacity), |_| {
        let (unit, probe) = ScriptedUnit::new();
        probes.push(probe);
        Ok(unit)
    })
    .expect("scripted pool");
    (Arc::new(pool), probes)
}

/// Simulate the clip on a unit reaching its end.
pub fn finish(probe: &Probe) {
    probe.lock().playing = false;
}

pub fn secs(value: f32) -> Duration {
    Duration::from_secs_f32(value)
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
