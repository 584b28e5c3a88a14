//! The spatial receiver sources are heard from.

use crate::AudioResult;
use crate::backend::{AudioBackend, Param, Target};
use crate::resources::Properties;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Listener orientation as an "at" and an "up" vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Direction the listener faces.
    pub at: [f32; 3],
    /// Which way is up for the listener.
    pub up: [f32; 3],
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            at: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl Orientation {
    /// Pack into the six floats the backend takes.
    pub fn to_array(self) -> [f32; 6] {
        let [ax, ay, az] = self.at;
        let [ux, uy, uz] = self.up;
        [ax, ay, az, ux, uy, uz]
    }

    /// Unpack the six floats the backend returns.
    pub fn from_array(values: [f32; 6]) -> Self {
        let [ax, ay, az, ux, uy, uz] = values;
        Self {
            at: [ax, ay, az],
            up: [ux, uy, uz],
        }
    }
}

/// Handle to the listener of a backend.
///
/// There is one listener per backend; every handle (they are cheap to
/// clone) addresses the same state. Accessors do not need a current
/// context.
#[derive(Clone)]
pub struct Listener {
    backend: Arc<dyn AudioBackend>,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").finish_non_exhaustive()
    }
}

impl Listener {
    /// Handle to `backend`'s listener.
    pub fn new(backend: Arc<dyn AudioBackend>) -> Self {
        Self { backend }
    }

    /// Master gain.
    pub fn gain(&self) -> AudioResult<f32> {
        self.get_f(Param::Gain)
    }

    /// Set the master gain.
    pub fn set_gain(&self, gain: f32) -> AudioResult<()> {
        self.set_f(Param::Gain, gain)
    }

    /// Listener position.
    pub fn position(&self) -> AudioResult<[f32; 3]> {
        self.get_3f(Param::Position)
    }

    /// Move the listener.
    pub fn set_position(&self, position: [f32; 3]) -> AudioResult<()> {
        self.set_3f(Param::Position, position)
    }

    /// Listener velocity.
    pub fn velocity(&self) -> AudioResult<[f32; 3]> {
        self.get_3f(Param::Velocity)
    }

    /// Set the listener velocity.
    pub fn set_velocity(&self, velocity: [f32; 3]) -> AudioResult<()> {
        self.set_3f(Param::Velocity, velocity)
    }

    /// Listener orientation.
    pub fn orientation(&self) -> AudioResult<Orientation> {
        let mut values = [0.0f32; 6];
        self.get_fv(Param::Orientation, &mut values)?;
        Ok(Orientation::from_array(values))
    }

    /// Turn the listener.
    pub fn set_orientation(&self, orientation: Orientation) -> AudioResult<()> {
        self.set_fv(Param::Orientation, &orientation.to_array())
    }
}

impl Properties for Listener {
    fn backend(&self) -> &dyn AudioBackend {
        &*self.backend
    }

    fn target(&self) -> Target {
        Target::Listener
    }
}
