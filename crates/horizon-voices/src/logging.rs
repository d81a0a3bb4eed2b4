//! Logging targets for the voice pool.
//!
//! Horizon Voices uses the `tracing` crate for all diagnostics. Install a
//! subscriber in the host application to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_voices::pool=debug")
//!     .init();
//! ```
//!
//! Usage errors are logged at fixed levels so hosts can filter them:
//!
//! | Condition | Level |
//! |-----------|-------|
//! | Empty clip, busy voice assigned, backend failure | `error` |
//! | Pool exhausted | `warn` |
//! | Operation on an expired handle, lifecycle events | `debug` |
//! | Per-tick task steps | `trace` |

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Voice assignment and master volume.
    pub const POOL: &str = "horizon_voices::pool";
    /// Per-voice lifecycle and tick tasks.
    pub const VOICE: &str = "horizon_voices::voice";
    /// Operations issued through playback handles.
    pub const HANDLE: &str = "horizon_voices::handle";
    /// Music cross-fading.
    pub const MUSIC: &str = "horizon_voices::music";
}
