//! Whole-clip playback on top of the resource handles.
//!
//! [`PlaybackEngine`] runs the complete chain for one clip: decode, open the
//! device, create and activate a context, upload the PCM, play, wait for the
//! source to finish, and tear everything down in order. Waiting is a polling
//! loop with exponential backoff that sleeps on a [`CancelToken`], bounded
//! by an optional timeout.
//!
//! # Example
//!
//! ```
//! use spatial_playback::backend::{ClockRenderer, SoftBackend, SourceState};
//! use spatial_playback::playback::{PlaybackConfig, PlaybackEngine};
//! use spatial_playback::wav::{WavFormat, encode_wav};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(SoftBackend::new(ClockRenderer::new().with_time_scale(50.0)));
//! let engine = PlaybackEngine::with_config(backend, PlaybackConfig::responsive());
//!
//! let clip = encode_wav(&WavFormat::mono16(8000), &vec![0u8; 1600]).unwrap();
//! let report = engine.play_from_memory(&clip).unwrap();
//! assert_eq!(report.final_state, SourceState::Stopped);
//! ```

mod cancel;
mod config;
mod engine;
mod handle;

pub use cancel::CancelToken;
pub use config::PlaybackConfig;
pub use engine::{PlaybackEngine, PlaybackReport, PlaybackStage};
pub use handle::PlaybackHandle;
