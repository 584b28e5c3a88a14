//! The guard for a context made current on the calling thread.

use super::{Buffer, Context};
use super::source::Source;
use crate::backend::{AudioBackend, ContextId, DistanceModel, GlobalParam, StringParam};
use crate::listener::Listener;
use crate::{AudioError, AudioResult};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::warn;

/// Proof that a [`Context`] is current on this thread.
///
/// Buffers and sources can only be created through the guard and borrow
/// it, so they are released before the context stops being current. The
/// guard is neither `Send` nor `Sync`: activation belongs to one thread.
pub struct CurrentContext<'c> {
    pub(super) context: &'c Context<'c>,
    pub(super) _not_send: PhantomData<*const ()>,
}

impl fmt::Debug for CurrentContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CurrentContext").field(&self.context.id()).finish()
    }
}

impl<'c> CurrentContext<'c> {
    /// Identifier of the active context.
    pub fn id(&self) -> ContextId {
        self.context.id()
    }

    /// Backend the context belongs to.
    pub fn backend(&self) -> &Arc<dyn AudioBackend> {
        self.context.backend()
    }

    /// Allocate an empty buffer.
    pub fn create_buffer(&self) -> AudioResult<Buffer<'_>> {
        let id = self.backend().create_buffer()?;
        Ok(Buffer::new(Arc::clone(self.backend()), id))
    }

    /// Allocate a source in the [`Initial`](crate::backend::SourceState::Initial) state.
    pub fn create_source(&self) -> AudioResult<Source<'_>> {
        let id = self.backend().create_source()?;
        Ok(Source::new(Arc::clone(self.backend()), id))
    }

    /// Handle to the listener of this backend.
    pub fn listener(&self) -> Listener {
        Listener::new(Arc::clone(self.backend()))
    }

    /// Doppler exaggeration factor.
    pub fn doppler_factor(&self) -> AudioResult<f32> {
        self.backend().global_float(GlobalParam::DopplerFactor)
    }

    /// Set the doppler exaggeration factor.
    pub fn set_doppler_factor(&self, value: f32) -> AudioResult<()> {
        self.backend().set_global_float(GlobalParam::DopplerFactor, value)
    }

    /// Reference velocity for doppler calculations.
    pub fn doppler_velocity(&self) -> AudioResult<f32> {
        self.backend().global_float(GlobalParam::DopplerVelocity)
    }

    /// Set the doppler reference velocity.
    pub fn set_doppler_velocity(&self, value: f32) -> AudioResult<()> {
        self.backend().set_global_float(GlobalParam::DopplerVelocity, value)
    }

    /// Speed of sound in world units per second.
    pub fn speed_of_sound(&self) -> AudioResult<f32> {
        self.backend().global_float(GlobalParam::SpeedOfSound)
    }

    /// Set the speed of sound.
    pub fn set_speed_of_sound(&self, value: f32) -> AudioResult<()> {
        self.backend().set_global_float(GlobalParam::SpeedOfSound, value)
    }

    /// Distance attenuation model in effect.
    pub fn distance_model(&self) -> AudioResult<DistanceModel> {
        let id = self.backend().global_int(GlobalParam::DistanceModel)?;
        DistanceModel::from_id(id).ok_or_else(|| {
            AudioError::hardware("distance model", format!("unknown model id {id:#x}"))
        })
    }

    /// Select the distance attenuation model.
    pub fn set_distance_model(&self, model: DistanceModel) -> AudioResult<()> {
        self.backend().set_global_int(GlobalParam::DistanceModel, model.id())
    }

    /// Implementation vendor.
    pub fn vendor(&self) -> AudioResult<String> {
        self.backend().string(StringParam::Vendor)
    }

    /// Implementation version.
    pub fn version(&self) -> AudioResult<String> {
        self.backend().string(StringParam::Version)
    }

    /// Renderer name.
    pub fn renderer(&self) -> AudioResult<String> {
        self.backend().string(StringParam::Renderer)
    }

    /// Space separated extension list.
    pub fn extensions(&self) -> AudioResult<String> {
        self.backend().string(StringParam::Extensions)
    }
}

impl Drop for CurrentContext<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.backend().make_context_current(None) {
            warn!(context = %self.id(), %err, "failed to release current context");
        }
    }
}
