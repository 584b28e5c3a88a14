//! Object ids, formats, states and property keys shared by every backend.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Wrap a raw backend name.
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// The raw backend name.
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

object_id!(
    /// Name of an open output device.
    DeviceId
);
object_id!(
    /// Name of a rendering context.
    ContextId
);
object_id!(
    /// Name of a PCM buffer.
    BufferId
);
object_id!(
    /// Name of a playback source.
    SourceId
);

/// Hardware sample layout of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferFormat {
    /// One channel of unsigned 8 bit samples.
    Mono8,
    /// One channel of signed 16 bit little-endian samples.
    Mono16,
    /// Two interleaved channels of unsigned 8 bit samples.
    Stereo8,
    /// Two interleaved channels of signed 16 bit little-endian samples.
    Stereo16,
}

impl BufferFormat {
    /// Map a channel count and bit depth to a buffer format.
    pub const fn from_layout(channels: u16, bits_per_sample: u16) -> Option<Self> {
        match (channels, bits_per_sample) {
            (1, 8) => Some(Self::Mono8),
            (1, 16) => Some(Self::Mono16),
            (2, 8) => Some(Self::Stereo8),
            (2, 16) => Some(Self::Stereo16),
            _ => None,
        }
    }

    /// Number of interleaved channels.
    pub const fn channels(self) -> u16 {
        match self {
            Self::Mono8 | Self::Mono16 => 1,
            Self::Stereo8 | Self::Stereo16 => 2,
        }
    }

    /// Bits per sample.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Mono8 | Self::Stereo8 => 8,
            Self::Mono16 | Self::Stereo16 => 16,
        }
    }

    /// Size of one frame (one sample for every channel) in bytes.
    pub const fn frame_size(self) -> usize {
        (self.channels() as usize) * (self.bits() as usize / 8)
    }

    /// The OpenAL enum value for this format.
    pub const fn al_enum(self) -> i32 {
        match self {
            Self::Mono8 => 0x1100,
            Self::Mono16 => 0x1101,
            Self::Stereo8 => 0x1102,
            Self::Stereo16 => 0x1103,
        }
    }
}

/// Playback state of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceState {
    /// Created or rewound, never played since.
    Initial,
    /// Currently rendering.
    Playing,
    /// Paused, keeps its position.
    Paused,
    /// Stopped explicitly or reached the end of its buffer.
    Stopped,
}

impl SourceState {
    /// Check if the source still holds a voice (playing or paused).
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }

    /// Check if a buffer may be attached in this state.
    pub const fn accepts_buffer(self) -> bool {
        matches!(self, Self::Initial | Self::Stopped)
    }

    /// The OpenAL enum value for this state.
    pub const fn al_enum(self) -> i32 {
        match self {
            Self::Initial => 0x1011,
            Self::Playing => 0x1012,
            Self::Paused => 0x1013,
            Self::Stopped => 0x1014,
        }
    }
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "initial",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Object addressed by a property accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The process-wide listener.
    Listener,
    /// A source in the calling thread's current context.
    Source(SourceId),
    /// A buffer in the calling thread's current context.
    Buffer(BufferId),
}

/// Property keys for listener, source and buffer accessors.
///
/// Discriminants match the OpenAL enum values so ids coming from native code
/// can be mapped with [`Param::from_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum Param {
    /// Source position is relative to the listener (integer, 0 or 1).
    SourceRelative = 0x202,
    /// Pitch multiplier, must be positive.
    Pitch = 0x1003,
    /// Position in world space.
    Position = 0x1004,
    /// Velocity in world space.
    Velocity = 0x1006,
    /// Restart at the end of the buffer (integer, 0 or 1).
    Looping = 0x1007,
    /// Linear gain, must not be negative.
    Gain = 0x100A,
    /// Lower clamp applied after attenuation.
    MinGain = 0x100D,
    /// Upper clamp applied after attenuation.
    MaxGain = 0x100E,
    /// Listener "at" and "up" vectors.
    Orientation = 0x100F,
    /// Distance at which attenuation starts.
    ReferenceDistance = 0x1020,
    /// Attenuation slope.
    RolloffFactor = 0x1021,
    /// Distance beyond which clamped models stop attenuating.
    MaxDistance = 0x1023,
    /// Playback position in seconds.
    SecOffset = 0x1024,
    /// Playback position in frames.
    SampleOffset = 0x1025,
    /// Buffer sample rate (read only).
    Frequency = 0x2001,
    /// Buffer bits per sample (read only).
    Bits = 0x2002,
    /// Buffer channel count (read only).
    Channels = 0x2003,
    /// Buffer size in bytes (read only).
    Size = 0x2004,
}

impl Param {
    const ALL: [Self; 18] = [
        Self::SourceRelative,
        Self::Pitch,
        Self::Position,
        Self::Velocity,
        Self::Looping,
        Self::Gain,
        Self::MinGain,
        Self::MaxGain,
        Self::Orientation,
        Self::ReferenceDistance,
        Self::RolloffFactor,
        Self::MaxDistance,
        Self::SecOffset,
        Self::SampleOffset,
        Self::Frequency,
        Self::Bits,
        Self::Channels,
        Self::Size,
    ];

    /// The OpenAL enum value.
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Look up a parameter by its OpenAL enum value.
    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.id() == id)
    }

    /// Number of values the property holds.
    pub const fn arity(self) -> usize {
        match self {
            Self::Position | Self::Velocity => 3,
            Self::Orientation => 6,
            _ => 1,
        }
    }
}

/// Context-wide numeric state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum GlobalParam {
    /// Scale applied to doppler shifts.
    DopplerFactor = 0xC000,
    /// Legacy doppler reference velocity.
    DopplerVelocity = 0xC001,
    /// Speed of sound in world units per second.
    SpeedOfSound = 0xC003,
    /// Active [`DistanceModel`], as its enum value.
    DistanceModel = 0xD000,
}

/// Descriptive strings reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum StringParam {
    /// Implementation vendor.
    Vendor = 0xB001,
    /// Implementation version.
    Version = 0xB002,
    /// Renderer in use.
    Renderer = 0xB003,
    /// Space separated extension list.
    Extensions = 0xB004,
}

/// Distance attenuation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum DistanceModel {
    /// No distance attenuation.
    None = 0,
    /// `ref / (ref + rolloff * (dist - ref))`.
    InverseDistance = 0xD001,
    /// Inverse model with the distance clamped to `[ref, max]`.
    #[default]
    InverseDistanceClamped = 0xD002,
    /// `1 - rolloff * (dist - ref) / (max - ref)`.
    LinearDistance = 0xD003,
    /// Linear model with the distance clamped to `[ref, max]`.
    LinearDistanceClamped = 0xD004,
    /// `(dist / ref) ^ -rolloff`.
    ExponentDistance = 0xD005,
    /// Exponent model with the distance clamped to `[ref, max]`.
    ExponentDistanceClamped = 0xD006,
}

impl DistanceModel {
    /// Look up a model by its enum value.
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::None),
            0xD001 => Some(Self::InverseDistance),
            0xD002 => Some(Self::InverseDistanceClamped),
            0xD003 => Some(Self::LinearDistance),
            0xD004 => Some(Self::LinearDistanceClamped),
            0xD005 => Some(Self::ExponentDistance),
            0xD006 => Some(Self::ExponentDistanceClamped),
            _ => None,
        }
    }

    /// The enum value.
    pub const fn id(self) -> i32 {
        self as i32
    }

    /// Whether the distance is clamped to `[reference, max]` first.
    pub const fn is_clamped(self) -> bool {
        matches!(
            self,
            Self::InverseDistanceClamped
                | Self::LinearDistanceClamped
                | Self::ExponentDistanceClamped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_format_layout() {
        assert_eq!(BufferFormat::from_layout(1, 16), Some(BufferFormat::Mono16));
        assert_eq!(BufferFormat::from_layout(2, 16), Some(BufferFormat::Stereo16));
        assert_eq!(BufferFormat::from_layout(6, 16), None);
        assert_eq!(BufferFormat::from_layout(2, 24), None);
        assert_eq!(BufferFormat::Stereo16.frame_size(), 4);
        assert_eq!(BufferFormat::Mono8.frame_size(), 1);
    }

    #[test]
    fn test_param_ids_round_trip() {
        assert_eq!(Param::from_id(0x100F), Some(Param::Orientation));
        assert_eq!(Param::from_id(Param::Gain.id()), Some(Param::Gain));
        assert_eq!(Param::from_id(0x7777), None);
        assert_eq!(Param::Orientation.arity(), 6);
        assert_eq!(Param::Velocity.arity(), 3);
    }

    #[test]
    fn test_distance_model_ids() {
        assert_eq!(DistanceModel::default(), DistanceModel::InverseDistanceClamped);
        assert_eq!(DistanceModel::from_id(0xD005), Some(DistanceModel::ExponentDistance));
        assert_eq!(DistanceModel::from_id(1), None);
        assert!(DistanceModel::LinearDistanceClamped.is_clamped());
    }

    #[test]
    fn test_source_state_predicates() {
        assert!(SourceState::Paused.is_active());
        assert!(!SourceState::Stopped.is_active());
        assert!(SourceState::Initial.accepts_buffer());
        assert!(!SourceState::Playing.accepts_buffer());
    }
}
