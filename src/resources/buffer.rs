//! Shared PCM buffer handles.

use super::{CurrentContext, Properties};
use crate::backend::{AudioBackend, BufferFormat, BufferId, Param, Target};
use crate::{AudioError, AudioResult};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

struct BufferInner {
    backend: Arc<dyn AudioBackend>,
    id: BufferId,
    released: bool,
}

impl Drop for BufferInner {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.backend.destroy_buffer(self.id) {
                warn!(buffer = %self.id, %err, "failed to delete buffer");
            }
        }
    }
}

/// A hardware buffer holding one clip.
///
/// Clones share the same backend buffer, which is deleted once the last
/// clone is gone. A [`Source`](super::Source) keeps a clone of the buffer
/// attached to it.
#[derive(Clone)]
pub struct Buffer<'c> {
    inner: Arc<BufferInner>,
    _context: PhantomData<&'c CurrentContext<'c>>,
}

impl fmt::Debug for Buffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Buffer").field(&self.inner.id).finish()
    }
}

impl<'c> Buffer<'c> {
    pub(super) fn new(backend: Arc<dyn AudioBackend>, id: BufferId) -> Self {
        Self {
            inner: Arc::new(BufferInner {
                backend,
                id,
                released: false,
            }),
            _context: PhantomData,
        }
    }

    /// Backend identifier.
    pub fn id(&self) -> BufferId {
        self.inner.id
    }

    /// Upload PCM bytes. The backend keeps its own copy.
    ///
    /// Rejected while a source has the buffer attached, for a zero
    /// `frequency`, or when `data` is not a whole number of frames.
    pub fn set_data(&self, format: BufferFormat, data: &[u8], frequency: u32) -> AudioResult<()> {
        self.inner
            .backend
            .buffer_data(self.inner.id, format, data, frequency)
    }

    /// Sample rate of the uploaded data.
    pub fn frequency(&self) -> AudioResult<i32> {
        self.get_i(Param::Frequency)
    }

    /// Bits per sample of the uploaded data.
    pub fn bits(&self) -> AudioResult<i32> {
        self.get_i(Param::Bits)
    }

    /// Channel count of the uploaded data.
    pub fn channels(&self) -> AudioResult<i32> {
        self.get_i(Param::Channels)
    }

    /// Size of the uploaded data in bytes.
    pub fn size(&self) -> AudioResult<i32> {
        self.get_i(Param::Size)
    }

    /// Delete the buffer now.
    ///
    /// Fails if other clones of this handle exist or a source still
    /// references the buffer.
    pub fn destroy(self) -> AudioResult<()> {
        let mut inner = Arc::try_unwrap(self.inner).map_err(|shared| {
            AudioError::hardware(
                "delete buffer",
                format!(
                    "{} is shared by {} handles",
                    shared.id,
                    Arc::strong_count(&shared)
                ),
            )
        })?;
        let result = inner.backend.destroy_buffer(inner.id);
        inner.released = result.is_ok();
        result
    }
}

impl Properties for Buffer<'_> {
    fn backend(&self) -> &dyn AudioBackend {
        &*self.inner.backend
    }

    fn target(&self) -> Target {
        Target::Buffer(self.inner.id)
    }
}
