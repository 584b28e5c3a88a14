//! Owned handles over backend objects.
//!
//! The handles form a borrow chain that mirrors the required teardown
//! order:
//!
//! ```text
//! Device ─ Context<'d> ─ CurrentContext<'c> ─┬─ Buffer<'c>
//!                                            └─ Source<'c>
//! ```
//!
//! A source or buffer cannot outlive the guard that made its context
//! current, the guard cannot outlive the context, and the context cannot
//! outlive the device. Every handle releases its object on drop (logging a
//! warning if the backend refuses) and offers an explicit `destroy`/`close`
//! that reports the error instead.
//!
//! ```
//! use spatial_playback::backend::{BufferFormat, SoftBackend, SourceState};
//! use spatial_playback::resources::Device;
//! use std::sync::Arc;
//!
//! let device = Device::open_default(Arc::new(SoftBackend::headless())).unwrap();
//! let context = device.create_context().unwrap();
//! let current = context.make_current().unwrap();
//!
//! let buffer = current.create_buffer().unwrap();
//! buffer.set_data(BufferFormat::Mono16, &[0u8; 32], 8000).unwrap();
//! let mut source = current.create_source().unwrap();
//! source.set_buffer(&buffer).unwrap();
//! assert_eq!(source.state().unwrap(), SourceState::Initial);
//! ```

mod buffer;
mod context;
mod device;
mod properties;
mod source;

pub use buffer::Buffer;
pub use context::CurrentContext;
pub use device::{Context, Device};
pub use properties::Properties;
pub use source::Source;
