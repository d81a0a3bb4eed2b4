//! Voice pool and playback control for game audio.
//!
//! This crate manages a fixed set of reusable playback voices on top of a
//! host engine's audio output:
//!
//! - **Voice pool**: a fixed number of voices, assigned in index order
//! - **Playback handles**: control volume, pitch, spatial blend and position
//!   of one playback, and expire as soon as it ends
//! - **Fades**: tick-driven volume ramps that coexist with a master volume
//! - **Music**: a cross-fading music player built on the pool
//!
//! The crate never decodes or mixes audio. Each voice owns a
//! [`PlaybackUnit`], an adapter over one of the host's output channels.
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
//! let engine_hum = pool.play_loop(&hum)?;
//! engine_hum.set_volume(0.6);
//!
//! pool.play_at(&explosion, Vec3::new(3.0, 0.0, -2.0))?
//!     .on_resolved(|how| println!("explosion done: {how:?}"));
//!
//! // Every frame:
//! pool.update(delta);
//!
//! // Later:
//! engine_hum.fade_out(Duration::from_secs(2), true);
//! ```
//!
//! # Ticking
//!
//! All time-dependent behaviour (natural completion, fades, follows, master
//! volume refresh) happens inside [`VoicePool::update`]. Hosts without a
//! frame delta can use [`FrameClock`].

mod error;
mod task;
mod voice;

pub mod clock;
pub mod config;
pub mod handle;
pub mod logging;
pub mod music;
pub mod pool;
pub mod unit;

pub use clock::FrameClock;
pub use config::{MusicConfig, PoolConfig};
pub use error::{Result, VoiceError};
pub use handle::{PlaybackHandle, PlaybackId, Resolution};
pub use music::MusicPlayer;
pub use pool::VoicePool;
pub use unit::{Clip, PlaybackUnit, PositionSource};

pub use glam::Vec3;
