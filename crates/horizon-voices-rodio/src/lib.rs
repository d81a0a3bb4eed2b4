//! rodio backend for Horizon Voices.
//!
//! This crate connects a [`VoicePool`](horizon_voices::VoicePool) to a real
//! output device:
//!
//! - **[`AudioOutput`]**: opens the default device and builds pools on it
//! - **[`RodioUnit`]**: a [`PlaybackUnit`](horizon_voices::PlaybackUnit)
//!   backed by a rodio spatial sink
//! - **[`SoundData`]**: encoded sound clips kept in memory
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use horizon_voices::{PoolConfig, Vec3};
//! use horizon_voices_rodio::{AudioOutput, SoundData};
//!
//! let output = AudioOutput::try_default()?;
//! let pool = Arc::new(output.create_pool(PoolConfig::default())?);
//!
//! let laser = SoundData::load("assets/laser.ogg")?;
//! pool.play_at(&laser, Vec3::new(-3.0, 0.0, 1.0))?;
//!
//! // Every frame:
//! pool.update(delta);
//! ```

mod error;
pub mod clip;
pub mod config;
pub mod output;
pub mod unit;

pub use clip::SoundData;
pub use config::RodioConfig;
pub use error::{Result, RodioError};
pub use output::AudioOutput;
pub use unit::RodioUnit;

/// `tracing` target for backend log records.
pub const LOG_TARGET: &str = "horizon_voices::rodio";
