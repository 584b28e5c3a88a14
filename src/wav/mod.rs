//! WAV decoding and encoding.
//!
//! Only uncompressed PCM in the canonical chunk order is understood: a
//! `RIFF`/`WAVE` header, one `fmt ` chunk (16, 18 or 40 bytes) and one
//! `data` chunk. The decoder keeps no state between calls.
//!
//! ```
//! use spatial_playback::wav::{WavFormat, encode_wav, read_wav_from_memory};
//!
//! let bytes = encode_wav(&WavFormat::mono16(8000), &[0u8; 16]).unwrap();
//! let (format, payload) = read_wav_from_memory(&bytes).unwrap();
//! assert_eq!(format.channels, 1);
//! assert_eq!(payload.len(), 16);
//! ```

mod decoder;
mod encoder;
mod format;

pub use decoder::{read_wav, read_wav_file, read_wav_from_memory};
pub use encoder::{encode_wav, write_wav};
pub use format::{FmtLayout, FormatTag, PcmPayload, WavExtension, WavFormat};
