//! Property storage for the listener, sources and context globals.

use crate::backend::{DistanceModel, GlobalParam, Param};
use crate::{AudioError, AudioResult};

pub(crate) fn check_arity(param: Param, len: usize) -> AudioResult<()> {
    if len == param.arity() {
        Ok(())
    } else {
        Err(AudioError::hardware(
            "property access",
            format!("{param:?} takes {} value(s), got {len}", param.arity()),
        ))
    }
}

pub(crate) fn invalid_param(object: &str, param: Param) -> AudioError {
    AudioError::hardware("property access", format!("{param:?} is not a {object} property"))
}

fn invalid_value(param: Param, values: &[f32]) -> AudioError {
    AudioError::hardware("property access", format!("invalid value {values:?} for {param:?}"))
}

fn non_negative(param: Param, value: f32) -> AudioResult<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid_value(param, &[value]))
    }
}

fn finite3(param: Param, values: &[f32]) -> AudioResult<[f32; 3]> {
    match values {
        [x, y, z] if values.iter().all(|v| v.is_finite()) => Ok([*x, *y, *z]),
        _ => Err(invalid_value(param, values)),
    }
}

fn flag(param: Param, value: f32) -> AudioResult<bool> {
    match value {
        v if v == 0.0 => Ok(false),
        v if v == 1.0 => Ok(true),
        _ => Err(invalid_value(param, &[value])),
    }
}

/// Receiver state; one instance per backend.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListenerProps {
    pub(crate) gain: f32,
    pub(crate) position: [f32; 3],
    pub(crate) velocity: [f32; 3],
    pub(crate) at: [f32; 3],
    pub(crate) up: [f32; 3],
}

impl Default for ListenerProps {
    fn default() -> Self {
        Self {
            gain: 1.0,
            position: [0.0; 3],
            velocity: [0.0; 3],
            at: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl ListenerProps {
    pub(crate) fn set(&mut self, param: Param, values: &[f32]) -> AudioResult<()> {
        check_arity(param, values.len())?;
        match param {
            Param::Gain => self.gain = non_negative(param, values[0])?,
            Param::Position => self.position = finite3(param, values)?,
            Param::Velocity => self.velocity = finite3(param, values)?,
            Param::Orientation => {
                self.at = finite3(param, &values[..3])?;
                self.up = finite3(param, &values[3..])?;
            }
            _ => return Err(invalid_param("listener", param)),
        }
        Ok(())
    }

    pub(crate) fn get(&self, param: Param, out: &mut [f32]) -> AudioResult<()> {
        check_arity(param, out.len())?;
        match param {
            Param::Gain => out[0] = self.gain,
            Param::Position => out.copy_from_slice(&self.position),
            Param::Velocity => out.copy_from_slice(&self.velocity),
            Param::Orientation => {
                out[..3].copy_from_slice(&self.at);
                out[3..].copy_from_slice(&self.up);
            }
            _ => return Err(invalid_param("listener", param)),
        }
        Ok(())
    }
}

/// Static source properties. Playback offsets live on the voice.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SourceProps {
    pub(crate) gain: f32,
    pub(crate) pitch: f32,
    pub(crate) position: [f32; 3],
    pub(crate) velocity: [f32; 3],
    pub(crate) looping: bool,
    pub(crate) relative: bool,
    pub(crate) min_gain: f32,
    pub(crate) max_gain: f32,
    pub(crate) reference_distance: f32,
    pub(crate) rolloff_factor: f32,
    pub(crate) max_distance: f32,
}

impl Default for SourceProps {
    fn default() -> Self {
        Self {
            gain: 1.0,
            pitch: 1.0,
            position: [0.0; 3],
            velocity: [0.0; 3],
            looping: false,
            relative: false,
            min_gain: 0.0,
            max_gain: 1.0,
            reference_distance: 1.0,
            rolloff_factor: 1.0,
            max_distance: f32::MAX,
        }
    }
}

impl SourceProps {
    pub(crate) fn set(&mut self, param: Param, values: &[f32]) -> AudioResult<()> {
        check_arity(param, values.len())?;
        let value = values[0];
        match param {
            Param::Gain => self.gain = non_negative(param, value)?,
            Param::Pitch => {
                if !(value.is_finite() && value > 0.0) {
                    return Err(invalid_value(param, values));
                }
                self.pitch = value;
            }
            Param::Position => self.position = finite3(param, values)?,
            Param::Velocity => self.velocity = finite3(param, values)?,
            Param::Looping => self.looping = flag(param, value)?,
            Param::SourceRelative => self.relative = flag(param, value)?,
            Param::MinGain => self.min_gain = non_negative(param, value)?,
            Param::MaxGain => self.max_gain = non_negative(param, value)?,
            Param::ReferenceDistance => self.reference_distance = non_negative(param, value)?,
            Param::RolloffFactor => self.rolloff_factor = non_negative(param, value)?,
            Param::MaxDistance => self.max_distance = non_negative(param, value)?,
            _ => return Err(invalid_param("source", param)),
        }
        Ok(())
    }

    pub(crate) fn get(&self, param: Param, out: &mut [f32]) -> AudioResult<()> {
        check_arity(param, out.len())?;
        match param {
            Param::Gain => out[0] = self.gain,
            Param::Pitch => out[0] = self.pitch,
            Param::Position => out.copy_from_slice(&self.position),
            Param::Velocity => out.copy_from_slice(&self.velocity),
            Param::Looping => out[0] = f32::from(u8::from(self.looping)),
            Param::SourceRelative => out[0] = f32::from(u8::from(self.relative)),
            Param::MinGain => out[0] = self.min_gain,
            Param::MaxGain => out[0] = self.max_gain,
            Param::ReferenceDistance => out[0] = self.reference_distance,
            Param::RolloffFactor => out[0] = self.rolloff_factor,
            Param::MaxDistance => out[0] = self.max_distance,
            _ => return Err(invalid_param("source", param)),
        }
        Ok(())
    }

    /// Integer write of a boolean property; only `0` and `1` are accepted.
    pub(crate) fn set_flag(&mut self, param: Param, value: i32) -> AudioResult<()> {
        let enabled = match value {
            0 => false,
            1 => true,
            _ => {
                return Err(AudioError::hardware(
                    "property access",
                    format!("invalid value {value} for {param:?}"),
                ));
            }
        };
        match param {
            Param::Looping => self.looping = enabled,
            Param::SourceRelative => self.relative = enabled,
            _ => return Err(invalid_param("source", param)),
        }
        Ok(())
    }

    pub(crate) fn flag(&self, param: Param) -> AudioResult<i32> {
        match param {
            Param::Looping => Ok(i32::from(self.looping)),
            Param::SourceRelative => Ok(i32::from(self.relative)),
            _ => Err(invalid_param("source", param)),
        }
    }
}

/// Context-wide values reachable through [`GlobalParam`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Globals {
    pub(crate) doppler_factor: f32,
    pub(crate) doppler_velocity: f32,
    pub(crate) speed_of_sound: f32,
    pub(crate) distance_model: DistanceModel,
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            doppler_factor: 1.0,
            doppler_velocity: 1.0,
            speed_of_sound: 343.3,
            distance_model: DistanceModel::default(),
        }
    }
}

impl Globals {
    pub(crate) fn get(&self, param: GlobalParam) -> f32 {
        match param {
            GlobalParam::DopplerFactor => self.doppler_factor,
            GlobalParam::DopplerVelocity => self.doppler_velocity,
            GlobalParam::SpeedOfSound => self.speed_of_sound,
            GlobalParam::DistanceModel => self.distance_model.id() as f32,
        }
    }

    pub(crate) fn set(&mut self, param: GlobalParam, value: f32) -> AudioResult<()> {
        let invalid = || {
            AudioError::hardware("global state", format!("invalid value {value} for {param:?}"))
        };
        match param {
            GlobalParam::DopplerFactor if value.is_finite() && value >= 0.0 => {
                self.doppler_factor = value;
            }
            GlobalParam::DopplerVelocity if value.is_finite() && value > 0.0 => {
                self.doppler_velocity = value;
            }
            GlobalParam::SpeedOfSound if value.is_finite() && value > 0.0 => {
                self.speed_of_sound = value;
            }
            GlobalParam::DistanceModel if value.fract() == 0.0 => {
                self.distance_model = DistanceModel::from_id(value as i32).ok_or_else(invalid)?;
            }
            _ => return Err(invalid()),
        }
        Ok(())
    }
}
