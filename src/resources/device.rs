//! Output device and context handles.

use super::CurrentContext;
use crate::backend::{AudioBackend, ContextId, DeviceId};
use crate::{AudioError, AudioResult};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// An open output device.
///
/// Closed by [`Device::close`] or, best effort, on drop. Contexts borrow the
/// device, so it cannot be closed while one is alive.
pub struct Device {
    backend: Arc<dyn AudioBackend>,
    id: DeviceId,
    name: String,
    released: bool,
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl Device {
    /// Open the device called `name`, or the default device for `None`.
    pub fn open(backend: Arc<dyn AudioBackend>, name: Option<&str>) -> AudioResult<Self> {
        let id = backend.open_device(name)?;
        let mut device = Self {
            backend,
            id,
            name: String::new(),
            released: false,
        };
        device.name = device.backend.device_name(id)?;
        debug!(device = %device.name, "device open");
        Ok(device)
    }

    /// Open the default output device.
    pub fn open_default(backend: Arc<dyn AudioBackend>) -> AudioResult<Self> {
        Self::open(backend, None)
    }

    /// Backend identifier.
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Name the backend resolved for this device.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backend this device belongs to.
    pub fn backend(&self) -> &Arc<dyn AudioBackend> {
        &self.backend
    }

    /// Create a rendering context on this device.
    pub fn create_context(&self) -> AudioResult<Context<'_>> {
        let id = self.backend.create_context(self.id)?;
        Ok(Context {
            device: self,
            id,
            released: false,
        })
    }

    /// Close the device, reporting failure instead of logging it.
    pub fn close(mut self) -> AudioResult<()> {
        let result = self.backend.close_device(self.id);
        self.released = result.is_ok();
        result
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.backend.close_device(self.id) {
                warn!(device = %self.name, %err, "failed to close device");
            }
        }
    }
}

/// A rendering context on a [`Device`].
pub struct Context<'d> {
    device: &'d Device,
    id: ContextId,
    released: bool,
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("device", &self.device.id)
            .finish()
    }
}

impl<'d> Context<'d> {
    /// Backend identifier.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Device the context renders to.
    pub fn device(&self) -> &'d Device {
        self.device
    }

    pub(crate) fn backend(&self) -> &Arc<dyn AudioBackend> {
        &self.device.backend
    }

    /// Make this context current on the calling thread.
    ///
    /// Fails with [`AudioError::DeviceUnavailable`] if a context is already
    /// current on this thread. The returned guard clears the thread's
    /// current context when dropped.
    pub fn make_current(&self) -> AudioResult<CurrentContext<'_>> {
        if let Some(active) = self.backend().current_context() {
            return Err(AudioError::device_unavailable(format!(
                "{active} is already current on this thread"
            )));
        }
        self.backend().make_context_current(Some(self.id))?;
        Ok(CurrentContext {
            context: self,
            _not_send: PhantomData,
        })
    }

    /// Destroy the context.
    ///
    /// Fails while it is current on any thread or still owns buffers or
    /// sources.
    pub fn destroy(mut self) -> AudioResult<()> {
        let result = self.backend().destroy_context(self.id);
        self.released = result.is_ok();
        result
    }
}

impl Drop for Context<'_> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(err) = self.backend().destroy_context(self.id) {
                warn!(context = %self.id, %err, "failed to destroy context");
            }
        }
    }
}
