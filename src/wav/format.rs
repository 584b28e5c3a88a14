//! WAV format descriptor and decoded payload.

use crate::backend::BufferFormat;
use crate::{AudioError, AudioResult, UnsupportedReason};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Value of the `wFormatTag` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatTag {
    /// Integer PCM (`1`).
    Pcm,
    /// `WAVE_FORMAT_EXTENSIBLE` (`0xFFFE`); the real format is in the sub-format GUID.
    Extensible,
    /// Any other tag, kept verbatim.
    Other(u16),
}

impl FormatTag {
    /// Interpret a raw tag value.
    pub const fn from_raw(raw: u16) -> Self {
        match raw {
            1 => Self::Pcm,
            0xFFFE => Self::Extensible,
            other => Self::Other(other),
        }
    }

    /// The value written to a `fmt ` chunk.
    pub const fn raw(self) -> u16 {
        match self {
            Self::Pcm => 1,
            Self::Extensible => 0xFFFE,
            Self::Other(raw) => raw,
        }
    }
}

/// Which of the three `fmt ` chunk layouts a header used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FmtLayout {
    /// The six base fields (16 bytes).
    #[default]
    Base,
    /// Base fields plus the extension size (18 bytes).
    Extended,
    /// Base fields plus the full extensible block (40 bytes).
    Extensible,
}

impl FmtLayout {
    /// Layout for a `fmt ` chunk of `size` bytes, if supported.
    pub const fn from_chunk_size(size: u32) -> Option<Self> {
        match size {
            16 => Some(Self::Base),
            18 => Some(Self::Extended),
            40 => Some(Self::Extensible),
            _ => None,
        }
    }

    /// Size in bytes of a `fmt ` chunk with this layout.
    pub const fn chunk_size(self) -> u32 {
        match self {
            Self::Base => 16,
            Self::Extended => 18,
            Self::Extensible => 40,
        }
    }
}

/// Optional tail of an 18 or 40 byte `fmt ` chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavExtension {
    /// Declared size of the extension (`cbSize`).
    pub size: u16,
    /// Valid bits per sample (40-byte layout only).
    pub valid_bits: Option<u16>,
    /// Speaker position mask (40-byte layout only).
    pub channel_mask: Option<u32>,
    /// Sub-format GUID bytes (40-byte layout only).
    pub sub_format: Option<[u8; 16]>,
}

/// Parsed `fmt ` chunk.
///
/// Produced once by the decoder and never changed afterwards. All sizes are
/// those declared in the file; nothing is cross-checked against the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavFormat {
    /// Encoding tag.
    pub format_tag: FormatTag,
    /// Which chunk layout was read.
    pub layout: FmtLayout,
    /// Interleaved channel count.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Average byte rate.
    pub avg_bytes_per_sec: u32,
    /// Bytes per frame.
    pub block_align: u16,
    /// Bits per single-channel sample.
    pub bits_per_sample: u16,
    /// Extension fields, present for the 18 and 40 byte layouts.
    pub extension: Option<WavExtension>,
}

impl WavFormat {
    /// Plain PCM header with derived block align and byte rate.
    ///
    /// Derived fields saturate at their field width when the inputs are too
    /// large to describe a real stream.
    pub fn new_pcm(channels: u16, sample_rate: u32, bits_per_sample: u16) -> Self {
        let block_align = channels.saturating_mul(bits_per_sample.div_ceil(8));
        Self {
            format_tag: FormatTag::Pcm,
            layout: FmtLayout::Base,
            channels,
            sample_rate,
            avg_bytes_per_sec: sample_rate.saturating_mul(u32::from(block_align)),
            block_align,
            bits_per_sample,
            extension: None,
        }
    }

    /// 16-bit mono PCM.
    pub fn mono16(sample_rate: u32) -> Self {
        Self::new_pcm(1, sample_rate, 16)
    }

    /// 16-bit stereo PCM.
    pub fn stereo16(sample_rate: u32) -> Self {
        Self::new_pcm(2, sample_rate, 16)
    }

    /// Number of whole frames in `payload_len` bytes.
    pub fn frame_count(&self, payload_len: usize) -> usize {
        match self.block_align {
            0 => 0,
            align => payload_len / usize::from(align),
        }
    }

    /// Playing time of `payload_len` bytes at the declared sample rate.
    pub fn duration(&self, payload_len: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count(payload_len) as f64 / f64::from(self.sample_rate))
    }

    /// Buffer format the clip can be uploaded as.
    ///
    /// Only mono/stereo 8/16-bit layouts map to a hardware format.
    pub fn buffer_format(&self) -> AudioResult<BufferFormat> {
        if !matches!(self.channels, 1 | 2) {
            return Err(AudioError::UnsupportedWavFile(
                UnsupportedReason::UnsupportedChannelCount(self.channels),
            ));
        }
        BufferFormat::from_layout(self.channels, self.bits_per_sample).ok_or(
            AudioError::UnsupportedWavFile(UnsupportedReason::UnsupportedBitDepth(
                self.bits_per_sample,
            )),
        )
    }
}

/// The raw bytes of a `data` chunk.
///
/// Its length is exactly the size the chunk declared.
#[derive(Clone, PartialEq, Eq)]
pub struct PcmPayload(Box<[u8]>);

impl PcmPayload {
    /// The sample bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty `data` chunk.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the bytes out.
    pub fn into_inner(self) -> Box<[u8]> {
        self.0
    }
}

impl From<Vec<u8>> for PcmPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into_boxed_slice())
    }
}

impl AsRef<[u8]> for PcmPayload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for PcmPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PcmPayload({} bytes)", self.0.len())
    }
}
