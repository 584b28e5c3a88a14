//! The native audio backend boundary.
//!
//! Everything the crate does to the output hardware goes through the
//! [`AudioBackend`] trait: opening devices, creating and activating contexts,
//! allocating buffers and sources, uploading PCM, transport control, state
//! queries and property access. Production code only depends on the trait so
//! a test double (or a native OpenAL binding) can stand in for the software
//! implementation shipped here.
//!
//! # Backends
//!
//! - [`SoftBackend`] keeps the object model in process and hands playing
//!   voices to a [`Renderer`].
//! - [`ClockRenderer`] advances voices against the wall clock without producing
//!   sound. It is what tests and headless machines use.
//! - `CpalRenderer` (feature `cpal-output`) renders voices to a real output
//!   device through cpal.

mod types;

pub mod renderer;
pub mod soft;

#[cfg(feature = "cpal-output")]
pub mod cpal_output;

pub use renderer::{ClockRenderer, Renderer};
pub use soft::{ObjectCounts, SoftBackend, Voice};
pub use types::{
    BufferFormat, BufferId, ContextId, DeviceId, DistanceModel, GlobalParam, Param, SourceId,
    SourceState, StringParam, Target,
};

#[cfg(feature = "cpal-output")]
pub use cpal_output::CpalRenderer;

use crate::AudioResult;
use std::sync::Arc;

/// Capability interface over the native rendering API.
///
/// Context activation is per calling thread: buffer and source calls resolve
/// against the context made current on the thread that issues them. Listener
/// and global calls address state shared by the whole backend.
///
/// Implementations validate property keys, arities and value ranges and
/// report rejections as [`AudioError::HardwareError`](crate::AudioError::HardwareError).
pub trait AudioBackend: Send + Sync {
    /// Open an output device by name, or the default device for `None`.
    fn open_device(&self, name: Option<&str>) -> AudioResult<DeviceId>;

    /// Close a device. Fails while the device still owns contexts.
    fn close_device(&self, device: DeviceId) -> AudioResult<()>;

    /// Human readable name of an open device.
    fn device_name(&self, device: DeviceId) -> AudioResult<String>;

    /// Create a rendering context on a device.
    fn create_context(&self, device: DeviceId) -> AudioResult<ContextId>;

    /// Destroy a context. Fails while it is current or still owns objects.
    fn destroy_context(&self, context: ContextId) -> AudioResult<()>;

    /// Make a context current on the calling thread, or clear it with `None`.
    fn make_context_current(&self, context: Option<ContextId>) -> AudioResult<()>;

    /// The context current on the calling thread.
    fn current_context(&self) -> Option<ContextId>;

    /// Allocate a buffer in the current context.
    fn create_buffer(&self) -> AudioResult<BufferId>;

    /// Delete a buffer. Fails while a source still references it.
    fn destroy_buffer(&self, buffer: BufferId) -> AudioResult<()>;

    /// Upload PCM into a buffer. The backend copies `data`.
    fn buffer_data(
        &self,
        buffer: BufferId,
        format: BufferFormat,
        data: &[u8],
        frequency: u32,
    ) -> AudioResult<()>;

    /// Allocate a source in the current context.
    fn create_source(&self) -> AudioResult<SourceId>;

    /// Delete a source, stopping it first.
    fn destroy_source(&self, source: SourceId) -> AudioResult<()>;

    /// Attach a buffer to a source, replacing any previous one; `None` detaches.
    fn attach_buffer(&self, source: SourceId, buffer: Option<BufferId>) -> AudioResult<()>;

    /// Start, resume or restart playback.
    fn play(&self, source: SourceId) -> AudioResult<()>;

    /// Pause a playing source.
    fn pause(&self, source: SourceId) -> AudioResult<()>;

    /// Stop a playing or paused source.
    fn stop(&self, source: SourceId) -> AudioResult<()>;

    /// Stop a source and return it to [`SourceState::Initial`].
    fn rewind(&self, source: SourceId) -> AudioResult<()>;

    /// Point-in-time playback state; never blocks on playback.
    fn source_state(&self, source: SourceId) -> AudioResult<SourceState>;

    /// Set a float property. `values.len()` must equal [`Param::arity`].
    fn set_floats(&self, target: Target, param: Param, values: &[f32]) -> AudioResult<()>;

    /// Read a float property into `out`, which must hold [`Param::arity`] values.
    fn get_floats(&self, target: Target, param: Param, out: &mut [f32]) -> AudioResult<()>;

    /// Set an integer property. `values.len()` must equal [`Param::arity`].
    fn set_ints(&self, target: Target, param: Param, values: &[i32]) -> AudioResult<()>;

    /// Read an integer property into `out`, which must hold [`Param::arity`] values.
    fn get_ints(&self, target: Target, param: Param, out: &mut [i32]) -> AudioResult<()>;

    /// Read a global as a float.
    fn global_float(&self, param: GlobalParam) -> AudioResult<f32>;

    /// Set a global from a float.
    fn set_global_float(&self, param: GlobalParam, value: f32) -> AudioResult<()>;

    /// Read a global as an integer.
    fn global_int(&self, param: GlobalParam) -> AudioResult<i32>;

    /// Set a global from an integer.
    fn set_global_int(&self, param: GlobalParam, value: i32) -> AudioResult<()>;

    /// Descriptive string about the implementation.
    fn string(&self, param: StringParam) -> AudioResult<String>;
}

/// The backend the crate uses when the caller does not supply one: cpal
/// output when the `cpal-output` feature is enabled, headless otherwise.
pub fn default_backend() -> Arc<dyn AudioBackend> {
    #[cfg(feature = "cpal-output")]
    {
        Arc::new(SoftBackend::new(CpalRenderer::new()))
    }

    #[cfg(not(feature = "cpal-output"))]
    {
        Arc::new(SoftBackend::headless())
    }
}
