//! RIFF/WAVE writer producing exactly the layout the decoder accepts.

use super::format::{FmtLayout, WavExtension, WavFormat};
use std::io::{self, Write};

fn chunk_len(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{len} bytes do not fit a RIFF chunk"),
        )
    })
}

fn write_fmt<W: Write>(writer: &mut W, format: &WavFormat) -> io::Result<()> {
    writer.write_all(b"fmt ")?;
    writer.write_all(&format.layout.chunk_size().to_le_bytes())?;
    writer.write_all(&format.format_tag.raw().to_le_bytes())?;
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.avg_bytes_per_sec.to_le_bytes())?;
    writer.write_all(&format.block_align.to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    let extension = format.extension.unwrap_or_default();
    match format.layout {
        FmtLayout::Base => {}
        FmtLayout::Extended => writer.write_all(&extension.size.to_le_bytes())?,
        FmtLayout::Extensible => {
            let WavExtension {
                size,
                valid_bits,
                channel_mask,
                sub_format,
            } = extension;
            let size = if size == 0 { 22 } else { size };
            writer.write_all(&size.to_le_bytes())?;
            writer.write_all(&valid_bits.unwrap_or(format.bits_per_sample).to_le_bytes())?;
            writer.write_all(&channel_mask.unwrap_or(0).to_le_bytes())?;
            writer.write_all(&sub_format.unwrap_or([0; 16]))?;
        }
    }
    Ok(())
}

/// Write `payload` as a WAV stream with `format`'s header.
///
/// The `fmt ` chunk uses `format.layout`; missing extension fields are
/// written as zeros (valid bits default to the sample size).
pub fn write_wav<W: Write>(mut writer: W, format: &WavFormat, payload: &[u8]) -> io::Result<()> {
    let data_len = chunk_len(payload.len())?;
    let riff_len = chunk_len(
        4 + 8 + format.layout.chunk_size() as usize + 8 + payload.len(),
    )?;

    writer.write_all(b"RIFF")?;
    writer.write_all(&riff_len.to_le_bytes())?;
    writer.write_all(b"WAVE")?;
    write_fmt(&mut writer, format)?;
    writer.write_all(b"data")?;
    writer.write_all(&data_len.to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()
}

/// Encode a WAV stream into memory.
pub fn encode_wav(format: &WavFormat, payload: &[u8]) -> io::Result<Vec<u8>> {
    let header = 12 + 8 + format.layout.chunk_size() as usize + 8;
    let mut bytes = Vec::with_capacity(header + payload.len());
    write_wav(&mut bytes, format, payload)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layout_bytes() {
        let bytes = encode_wav(&WavFormat::mono16(8000), &[1, 0, 2, 0]).unwrap();
        assert_eq!(bytes.len(), 44 + 4);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 40);
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        assert_eq!(u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(&bytes[44..], &[1, 0, 2, 0]);
    }

    #[test]
    fn test_extensible_layout_size() {
        let format = WavFormat {
            layout: FmtLayout::Extensible,
            ..WavFormat::stereo16(44100)
        };
        let bytes = encode_wav(&format, &[]).unwrap();
        assert_eq!(bytes.len(), 12 + 8 + 40 + 8);
        assert_eq!(u16::from_le_bytes([bytes[36], bytes[37]]), 22);
    }
}
