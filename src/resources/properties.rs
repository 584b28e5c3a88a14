//! Typed property accessors shared by the listener, sources and buffers.

use crate::AudioResult;
use crate::backend::{AudioBackend, Param, Target};

/// Typed property access shared by the listener, sources and buffers.
///
/// Every accessor addresses the backend with the implementor's [`Target`]
/// and a [`Param`]. Arity, read-only and range checks happen in the
/// backend, which reports violations as
/// [`AudioError::HardwareError`](crate::AudioError::HardwareError).
/// The vector forms use a fresh array per call.
pub trait Properties {
    /// Backend the object lives in.
    fn backend(&self) -> &dyn AudioBackend;

    /// Object addressed by the accessors.
    fn target(&self) -> Target;

    /// Set a scalar float property.
    fn set_f(&self, param: Param, value: f32) -> AudioResult<()> {
        self.backend().set_floats(self.target(), param, &[value])
    }

    /// Read a scalar float property.
    fn get_f(&self, param: Param) -> AudioResult<f32> {
        let mut out = [0.0f32];
        self.backend().get_floats(self.target(), param, &mut out)?;
        Ok(out[0])
    }

    /// Set a scalar integer property.
    fn set_i(&self, param: Param, value: i32) -> AudioResult<()> {
        self.backend().set_ints(self.target(), param, &[value])
    }

    /// Read a scalar integer property.
    fn get_i(&self, param: Param) -> AudioResult<i32> {
        let mut out = [0i32];
        self.backend().get_ints(self.target(), param, &mut out)?;
        Ok(out[0])
    }

    /// Set a three component float property.
    fn set_3f(&self, param: Param, value: [f32; 3]) -> AudioResult<()> {
        self.backend().set_floats(self.target(), param, &value)
    }

    /// Read a three component float property.
    fn get_3f(&self, param: Param) -> AudioResult<[f32; 3]> {
        let mut out = [0.0f32; 3];
        self.backend().get_floats(self.target(), param, &mut out)?;
        Ok(out)
    }

    /// Set a three component integer property.
    fn set_3i(&self, param: Param, value: [i32; 3]) -> AudioResult<()> {
        self.backend().set_ints(self.target(), param, &value)
    }

    /// Read a three component integer property.
    fn get_3i(&self, param: Param) -> AudioResult<[i32; 3]> {
        let mut out = [0i32; 3];
        self.backend().get_ints(self.target(), param, &mut out)?;
        Ok(out)
    }

    /// Set a float property of any arity.
    fn set_fv(&self, param: Param, values: &[f32]) -> AudioResult<()> {
        self.backend().set_floats(self.target(), param, values)
    }

    /// Read a float property of any arity into `out`.
    fn get_fv(&self, param: Param, out: &mut [f32]) -> AudioResult<()> {
        self.backend().get_floats(self.target(), param, out)
    }

    /// Set an integer property of any arity.
    fn set_iv(&self, param: Param, values: &[i32]) -> AudioResult<()> {
        self.backend().set_ints(self.target(), param, values)
    }

    /// Read an integer property of any arity into `out`.
    fn get_iv(&self, param: Param, out: &mut [i32]) -> AudioResult<()> {
        self.backend().get_ints(self.target(), param, out)
    }
}
