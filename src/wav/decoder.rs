//! Strict RIFF/WAVE reader.
//!
//! The accepted layout is fixed: `RIFF` header, `WAVE` form type, a `fmt `
//! chunk of 16, 18 or 40 bytes, immediately followed by the `data` chunk.
//! Any other chunk order is rejected rather than skipped.

use super::format::{FmtLayout, FormatTag, PcmPayload, WavExtension, WavFormat};
use crate::{AudioError, AudioResult, UnsupportedReason};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Upper bound on the up-front allocation for a `data` chunk; the rest grows
/// as bytes actually arrive, so a lying size field cannot force a huge
/// allocation.
const MAX_PREALLOCATION: usize = 1 << 20;

/// Fill `buf`, mapping a premature end of stream to `on_eof`.
fn read_or<R: Read>(reader: &mut R, buf: &mut [u8], on_eof: AudioError) -> AudioResult<()> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(on_eof),
        Err(err) => Err(AudioError::ReadError(err)),
    }
}

fn expect_tag<R: Read>(
    reader: &mut R,
    tag: &[u8; 4],
    on_mismatch: fn() -> AudioError,
) -> AudioResult<()> {
    let mut found = [0u8; 4];
    read_or(reader, &mut found, on_mismatch())?;
    if &found == tag {
        Ok(())
    } else {
        Err(on_mismatch())
    }
}

fn header_u32<R: Read>(reader: &mut R) -> AudioResult<u32> {
    let mut bytes = [0u8; 4];
    read_or(reader, &mut bytes, AudioError::NotAWavFile)?;
    Ok(u32::from_le_bytes(bytes))
}

fn read_u16<R: Read>(reader: &mut R) -> io::Result<u16> {
    let mut bytes = [0u8; 2];
    reader.read_exact(&mut bytes)?;
    Ok(u16::from_le_bytes(bytes))
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

fn not_a_wav() -> AudioError {
    AudioError::NotAWavFile
}

fn missing_data() -> AudioError {
    AudioError::UnsupportedWavFile(UnsupportedReason::MissingDataChunk)
}

fn read_fmt_body<R: Read>(reader: &mut R, layout: FmtLayout) -> io::Result<WavFormat> {
    let format_tag = FormatTag::from_raw(read_u16(reader)?);
    let channels = read_u16(reader)?;
    let sample_rate = read_u32(reader)?;
    let avg_bytes_per_sec = read_u32(reader)?;
    let block_align = read_u16(reader)?;
    let bits_per_sample = read_u16(reader)?;

    let extension = match layout {
        FmtLayout::Base => None,
        FmtLayout::Extended => Some(WavExtension {
            size: read_u16(reader)?,
            ..WavExtension::default()
        }),
        FmtLayout::Extensible => {
            let size = read_u16(reader)?;
            let valid_bits = read_u16(reader)?;
            let channel_mask = read_u32(reader)?;
            let mut sub_format = [0u8; 16];
            reader.read_exact(&mut sub_format)?;
            Some(WavExtension {
                size,
                valid_bits: Some(valid_bits),
                channel_mask: Some(channel_mask),
                sub_format: Some(sub_format),
            })
        }
    };

    Ok(WavFormat {
        format_tag,
        layout,
        channels,
        sample_rate,
        avg_bytes_per_sec,
        block_align,
        bits_per_sample,
        extension,
    })
}

/// Decode a WAV stream into its format and raw sample bytes.
///
/// # Errors
///
/// - [`AudioError::NotAWavFile`] if the `RIFF`, `WAVE` or `fmt ` markers are
///   wrong or the stream ends inside them.
/// - [`AudioError::UnsupportedWavFile`] for a `fmt ` chunk of unknown size or
///   a chunk other than `data` after it.
/// - [`AudioError::SizeMismatch`] if the stream ends before the declared
///   number of `data` bytes.
/// - [`AudioError::ReadError`] for I/O failures and truncated `fmt ` bodies.
///
/// Nothing is returned on failure; in particular no partial payload.
pub fn read_wav<R: Read>(mut reader: R) -> AudioResult<(WavFormat, PcmPayload)> {
    expect_tag(&mut reader, b"RIFF", not_a_wav)?;
    let _riff_len = header_u32(&mut reader)?;
    expect_tag(&mut reader, b"WAVE", not_a_wav)?;
    expect_tag(&mut reader, b"fmt ", not_a_wav)?;

    let fmt_len = header_u32(&mut reader)?;
    let layout = FmtLayout::from_chunk_size(fmt_len).ok_or(AudioError::UnsupportedWavFile(
        UnsupportedReason::UnsupportedFmtSize(fmt_len),
    ))?;
    let format = read_fmt_body(&mut reader, layout)?;

    expect_tag(&mut reader, b"data", missing_data)?;
    let declared = read_u32(&mut reader)? as usize;

    let mut payload = Vec::with_capacity(declared.min(MAX_PREALLOCATION));
    (&mut reader).take(declared as u64).read_to_end(&mut payload)?;
    if payload.len() < declared {
        return Err(AudioError::SizeMismatch {
            expected: declared,
            actual: payload.len(),
        });
    }

    debug!(
        tag = ?format.format_tag,
        layout = ?format.layout,
        channels = format.channels,
        sample_rate = format.sample_rate,
        bits = format.bits_per_sample,
        bytes = declared,
        "decoded WAV"
    );
    Ok((format, PcmPayload::from(payload)))
}

/// Decode a WAV clip held in memory.
pub fn read_wav_from_memory(bytes: &[u8]) -> AudioResult<(WavFormat, PcmPayload)> {
    read_wav(bytes)
}

/// Decode a WAV file from disk. Failing to open the file is a
/// [`AudioError::ReadError`].
pub fn read_wav_file(path: impl AsRef<Path>) -> AudioResult<(WavFormat, PcmPayload)> {
    let file = File::open(path.as_ref())?;
    read_wav(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::encode_wav;

    fn samples(n: usize) -> Vec<u8> {
        (0..n)
            .flat_map(|i| ((i as i16).wrapping_mul(37)).to_le_bytes())
            .collect()
    }

    fn mono_clip(layout: FmtLayout, n: usize) -> Vec<u8> {
        let format = WavFormat {
            layout,
            ..WavFormat::mono16(8000)
        };
        encode_wav(&format, &samples(n)).unwrap()
    }

    fn base_fields(format: &WavFormat) -> (FormatTag, u16, u32, u32, u16, u16) {
        (
            format.format_tag,
            format.channels,
            format.sample_rate,
            format.avg_bytes_per_sec,
            format.block_align,
            format.bits_per_sample,
        )
    }

    #[test]
    fn test_decode_minimal_mono_clip() {
        let (format, payload) = read_wav_from_memory(&mono_clip(FmtLayout::Base, 100)).unwrap();
        assert_eq!(format.channels, 1);
        assert_eq!(format.bits_per_sample, 16);
        assert_eq!(format.layout, FmtLayout::Base);
        assert_eq!(format.extension, None);
        assert_eq!(payload.len(), 200);
        assert_eq!(payload.as_bytes(), samples(100).as_slice());
    }

    #[test]
    fn test_fmt_variants_share_base_fields() {
        let (base, base_payload) = read_wav_from_memory(&mono_clip(FmtLayout::Base, 10)).unwrap();
        let (extended, extended_payload) =
            read_wav_from_memory(&mono_clip(FmtLayout::Extended, 10)).unwrap();
        let (extensible, extensible_payload) =
            read_wav_from_memory(&mono_clip(FmtLayout::Extensible, 10)).unwrap();

        assert_eq!(base_fields(&base), base_fields(&extended));
        assert_eq!(base_fields(&base), base_fields(&extensible));
        assert_eq!(base_payload, extended_payload);
        assert_eq!(base_payload, extensible_payload);

        assert_eq!(extended.extension.map(|ext| ext.size), Some(0));
        let ext = extensible.extension.unwrap();
        assert_eq!(ext.size, 22);
        assert_eq!(ext.valid_bits, Some(16));
    }

    #[test]
    fn test_truncated_data_is_size_mismatch() {
        let mut bytes = mono_clip(FmtLayout::Base, 100);
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            read_wav_from_memory(&bytes),
            Err(AudioError::SizeMismatch {
                expected: 200,
                actual: 197
            })
        ));
    }

    #[test]
    fn test_truncated_before_wave_is_not_a_wav() {
        let bytes = mono_clip(FmtLayout::Base, 4);
        for len in [0, 3, 4, 7, 10] {
            assert!(
                matches!(read_wav_from_memory(&bytes[..len]), Err(AudioError::NotAWavFile)),
                "length {len}"
            );
        }
    }

    #[test]
    fn test_garbage_markers() {
        let mut bytes = mono_clip(FmtLayout::Base, 4);
        bytes[12..16].copy_from_slice(b"junk");
        assert!(matches!(
            read_wav_from_memory(&bytes),
            Err(AudioError::NotAWavFile)
        ));

        let mut bytes = mono_clip(FmtLayout::Base, 4);
        bytes[36..40].copy_from_slice(b"LIST");
        assert!(matches!(
            read_wav_from_memory(&bytes),
            Err(AudioError::UnsupportedWavFile(UnsupportedReason::MissingDataChunk))
        ));

        let mut bytes = mono_clip(FmtLayout::Base, 4);
        bytes[0..4].copy_from_slice(b"RIFX");
        assert!(matches!(
            read_wav_from_memory(&bytes),
            Err(AudioError::NotAWavFile)
        ));
    }

    #[test]
    fn test_unknown_fmt_size_is_rejected() {
        let mut bytes = mono_clip(FmtLayout::Base, 4);
        bytes[16..20].copy_from_slice(&20u32.to_le_bytes());
        assert!(matches!(
            read_wav_from_memory(&bytes),
            Err(AudioError::UnsupportedWavFile(
                UnsupportedReason::UnsupportedFmtSize(20)
            ))
        ));
    }

    #[test]
    fn test_truncated_fmt_body_is_read_error() {
        let bytes = mono_clip(FmtLayout::Base, 4);
        assert!(matches!(
            read_wav_from_memory(&bytes[..30]),
            Err(AudioError::ReadError(_))
        ));
    }

    #[test]
    fn test_missing_data_tag_bytes() {
        let bytes = mono_clip(FmtLayout::Base, 4);
        assert!(matches!(
            read_wav_from_memory(&bytes[..38]),
            Err(AudioError::UnsupportedWavFile(UnsupportedReason::MissingDataChunk))
        ));
    }

    #[test]
    fn test_round_trip_preserves_fields_and_payload() {
        let format = WavFormat::new_pcm(2, 22050, 8);
        let payload: Vec<u8> = (0..=255).collect();
        let bytes = encode_wav(&format, &payload).unwrap();
        let (decoded, decoded_payload) = read_wav_from_memory(&bytes).unwrap();
        assert_eq!(decoded, format);
        assert_eq!(decoded_payload.as_bytes(), payload.as_slice());
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut bytes = mono_clip(FmtLayout::Base, 4);
        bytes.extend_from_slice(b"LIST\x04\x00\x00\x00abcd");
        let (_, payload) = read_wav_from_memory(&bytes).unwrap();
        assert_eq!(payload.len(), 8);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = read_wav_file("/definitely/not/here.wav");
        assert!(matches!(result, Err(AudioError::ReadError(_))));
    }
}
