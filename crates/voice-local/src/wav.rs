//! PCM to WAV encoding for upload to transcription services

use crate::{AudioFormat, Result};
use std::io::Cursor;
use std::path::Path;

fn spec(format: AudioFormat) -> hound::WavSpec {
    hound::WavSpec {
        channels: format.channels.max(1),
        sample_rate: format.sample_rate_hz,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Encode interleaved signed 16-bit PCM as an in-memory WAV file.
pub fn encode_wav(pcm: &[i16], format: AudioFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::with_capacity(44 + pcm.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec(format))?;
        for &s in pcm {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Write interleaved signed 16-bit PCM to a WAV file on disk.
pub fn write_wav_file(path: impl AsRef<Path>, pcm: &[i16], format: AudioFormat) -> Result<()> {
    let mut writer = hound::WavWriter::create(path, spec(format))?;
    for &s in pcm {
        writer.write_sample(s)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header_and_samples() {
        let fmt = AudioFormat {
            sample_rate_hz: 16_000,
            channels: 1,
        };
        let pcm: Vec<i16> = (0..160).map(|i| (i * 100) as i16).collect();
        let bytes = encode_wav(&pcm, fmt).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + pcm.len() * 2);

        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 16_000);
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, pcm);
    }

    #[test]
    fn test_duration_ms() {
        let fmt = AudioFormat {
            sample_rate_hz: 48_000,
            channels: 1,
        };
        assert_eq!(fmt.duration_ms(48_000 * 5), 5_000);
    }
}
