// Correctness and logic
#![warn(clippy::unit_cmp)]
#![warn(clippy::match_same_arms)]
// Performance
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::map_clone)]
#![warn(clippy::unnecessary_to_owned)]
#![warn(clippy::large_stack_arrays)]
#![warn(clippy::needless_collect)]
// Style
#![warn(clippy::redundant_clone)]
#![warn(clippy::needless_return)]
#![warn(clippy::let_unit_value)]
#![warn(clippy::manual_map)]
#![warn(clippy::unwrap_used)]
// Maintainability
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::missing_const_for_fn)]
#![allow(clippy::too_many_arguments)]
#![deny(missing_docs)]

//! # spatial_playback
//!
//! A small 3D audio playback layer: decode a PCM WAV clip, push it through a
//! device → context → buffer → source chain and wait for it to finish.
//!
//! ## Layers
//!
//! - [`wav`]: strict RIFF/WAVE decoder (plus an encoder for building clips).
//! - [`backend`]: the [`AudioBackend`](backend::AudioBackend) capability
//!   trait every hardware call goes through, and [`SoftBackend`](backend::SoftBackend),
//!   an in-process implementation rendering through cpal or a headless clock.
//! - [`resources`]: owned `Device`, `Context`, `CurrentContext`, `Buffer` and
//!   `Source` handles whose lifetimes encode the teardown order.
//! - [`listener`]: handle to the listener of a backend.
//! - [`playback`]: [`PlaybackEngine`](playback::PlaybackEngine), which runs the
//!   whole chain for one clip with cancellation and a timeout.
//!
//! ## Features
//!
//! - `cpal-output` (default): render to the host's output device via `cpal`.
//!   Without it [`backend::default_backend`] is headless.
//!
//! ## Error Handling
//!
//! Every fallible call returns [`AudioResult`]:
//!
//! ```rust
//! use spatial_playback::{AudioError, wav};
//!
//! match wav::read_wav_from_memory(b"RIFX....") {
//!     Err(AudioError::NotAWavFile) => {}
//!     Err(err) if err.is_decode_error() => eprintln!("bad clip: {err}"),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (stage changes at `debug`, finished
//! playbacks at `info`, failed releases at `warn`) and installs no
//! subscriber of its own.

pub mod backend;
pub mod error;
pub mod listener;
pub mod playback;
pub mod resources;
pub mod utils;
pub mod wav;

pub use error::{AudioError, AudioResult, UnsupportedReason};
pub use listener::{Listener, Orientation};
pub use playback::{CancelToken, PlaybackConfig, PlaybackEngine, PlaybackReport};
