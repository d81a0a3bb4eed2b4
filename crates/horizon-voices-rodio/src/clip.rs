//! In-memory sound clips.
//!
//! A [`SoundData`] holds the encoded bytes of one sound file. Loading
//! validates the data once by decoding its header; every playback then
//! decodes its own copy from the shared bytes, so one clip can play on
//! several voices at the same time.
//!
//! # Supported Formats
//!
//! - WAV
//! - MP3
//! - OGG Vorbis
//! - FLAC

use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use horizon_voices::Clip;
use rodio::{Decoder, Source};
use tracing::debug;

use crate::LOG_TARGET;
use crate::error::Result;

pub(crate) type ClipDecoder = Decoder<Cursor<Arc<[u8]>>>;

/// Encoded audio data shared between playbacks.
///
/// Cloning is cheap. The default value is an empty clip, which voice pools
/// refuse to play.
#[derive(Clone, Default)]
pub struct SoundData {
    bytes: Arc<[u8]>,
}

impl SoundData {
    /// Load a sound from a file.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let explosion = SoundData::load("assets/explosion.wav")?;
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        debug!(target: LOG_TARGET, path = %path.display(), bytes = data.len(), "Loaded sound file");
        Self::from_bytes(data)
    }

    /// Create a sound from encoded bytes. The format is auto-detected.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        let sound = Self { bytes: data.into() };
        sound.decoder()?;
        Ok(sound)
    }

    /// Size of the encoded data in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the clip holds no data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Playing time, when the format records it.
    pub fn duration(&self) -> Option<Duration> {
        self.decoder().ok()?.total_duration()
    }

    /// A fresh decoder over the shared bytes.
    pub(crate) fn decoder(&self) -> Result<ClipDecoder> {
        Ok(Decoder::new(Cursor::new(self.bytes.clone()))?)
    }
}

impl Clip for SoundData {
    fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for SoundData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundData")
            .field("len", &self.bytes.len())
            .finish()
    }
}
