/// WAV framing for the PCM reference codec.
///
/// Outside raw-packet mode the PCM encoder opens its output with a
/// streaming 44-byte RIFF header, and the PCM decoder skips (and learns the
/// stream format from) such a header.
pub const WAV_HEADER_SIZE: usize = 44;

/// Bit depth of everything the PCM codec writes.
pub const PCM_BIT_DEPTH: u16 = 16;

/// Stream format carried by a WAV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bit_depth: u16,
}

/// Generate a 44-byte PCM WAV header.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (PCM format chunk size)
/// [20-21]  1 (PCM format code)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size (0 while streaming)
/// ```
pub fn generate_wav_header(format: WavFormat, data_size: u32) -> [u8; WAV_HEADER_SIZE] {
    let byte_rate = format.sample_rate * format.channels as u32 * format.bit_depth as u32 / 8;
    let block_align = format.channels * format.bit_depth / 8;
    let chunk_size = 36 + data_size;

    let mut header = [0u8; WAV_HEADER_SIZE];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&format.bit_depth.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    header
}

/// Read the format from the start of `bytes` if it begins with a PCM WAV
/// header this codec can play.
pub fn parse_wav_header(bytes: &[u8]) -> Option<WavFormat> {
    if bytes.len() < WAV_HEADER_SIZE || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }
    if &bytes[12..16] != b"fmt " || &bytes[36..40] != b"data" {
        return None;
    }

    let format_code = u16::from_le_bytes([bytes[20], bytes[21]]);
    let channels = u16::from_le_bytes([bytes[22], bytes[23]]);
    let sample_rate = u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);
    let bit_depth = u16::from_le_bytes([bytes[34], bytes[35]]);

    if format_code != 1 || channels == 0 || sample_rate == 0 || bit_depth != PCM_BIT_DEPTH {
        return None;
    }

    Some(WavFormat {
        sample_rate,
        channels,
        bit_depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_48k() -> WavFormat {
        WavFormat {
            sample_rate: 48000,
            channels: 2,
            bit_depth: 16,
        }
    }

    #[test]
    fn header_riff_magic() {
        let header = generate_wav_header(stereo_48k(), 0);
        assert_eq!(header.len(), 44);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
    }

    #[test]
    fn header_derived_fields() {
        let header = generate_wav_header(stereo_48k(), 9600);

        let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
        assert_eq!(byte_rate, 192000); // 48000 * 2 * 16/8

        let block_align = u16::from_le_bytes([header[32], header[33]]);
        assert_eq!(block_align, 4);

        let chunk_size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        assert_eq!(chunk_size, 36 + 9600);
    }

    #[test]
    fn parse_reads_generated_header() {
        let header = generate_wav_header(stereo_48k(), 0);
        assert_eq!(parse_wav_header(&header), Some(stereo_48k()));
    }

    #[test]
    fn parse_rejects_short_or_foreign_data() {
        assert_eq!(parse_wav_header(&[0u8; 10]), None);
        assert_eq!(parse_wav_header(&[0u8; 64]), None);

        let mut header = generate_wav_header(stereo_48k(), 0);
        header[34..36].copy_from_slice(&24u16.to_le_bytes());
        assert_eq!(parse_wav_header(&header), None);
    }
}
