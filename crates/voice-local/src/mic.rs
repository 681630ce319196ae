//! Default-microphone capture as mono i16 chunks.

use crate::{AudioFormat, Result, VoiceError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const CHUNK_SAMPLES: usize = 2048;

/// Keeps the input stream alive; capture stops when dropped.
pub struct MicStream {
    _stream: cpal::Stream,
}

/// Open the default input device. Samples arrive on the receiver already
/// down-mixed to mono (first channel) at the device's native rate.
pub fn start_default_input() -> Result<(MicStream, AudioFormat, Receiver<Vec<i16>>)> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| VoiceError::Device("no default input device".into()))?;
    let config = device
        .default_input_config()
        .map_err(|e| VoiceError::Device(format!("input config: {e}")))?;
    let sample_rate = config.sample_rate().0;
    let channels = config.channels();
    info!(
        device = %device.name().unwrap_or_default(),
        sample_rate,
        channels,
        "opening input device"
    );

    let (tx, rx) = mpsc::channel::<Vec<i16>>();
    let stream_config: cpal::StreamConfig = config.clone().into();
    let stream = match config.sample_format() {
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, tx)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, tx)?,
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, tx)?,
        other => {
            return Err(VoiceError::Device(format!(
                "unsupported sample format: {other:?}"
            )))
        }
    };
    stream
        .play()
        .map_err(|e| VoiceError::Device(format!("stream play: {e}")))?;

    Ok((
        MicStream { _stream: stream },
        AudioFormat {
            sample_rate_hz: sample_rate,
            channels: 1,
        },
        rx,
    ))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    tx: Sender<Vec<i16>>,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let channels = usize::from(config.channels.max(1));
    let mut buf = Vec::<i16>::with_capacity(CHUNK_SAMPLES * 2);
    device
        .build_input_stream(
            config,
            move |data: &[T], _| {
                buf.extend(data.chunks_exact(channels).map(|f| f[0].to_sample::<i16>()));
                if buf.len() >= CHUNK_SAMPLES {
                    let _ = tx.send(std::mem::take(&mut buf));
                }
            },
            |err| warn!(error = %err, "input stream error"),
            None,
        )
        .map_err(|e| VoiceError::Device(format!("build input stream: {e}")))
}

/// Collect `length` worth of audio from a capture receiver. Returns early
/// with what was gathered if the stream ends.
pub fn record_chunk(rx: &Receiver<Vec<i16>>, format: AudioFormat, length: Duration) -> Vec<i16> {
    let wanted = (u128::from(format.sample_rate_hz) * length.as_millis() / 1000) as usize;
    let deadline = Instant::now() + length + Duration::from_millis(500);
    let mut pcm = Vec::with_capacity(wanted);
    while pcm.len() < wanted {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(chunk) => pcm.extend_from_slice(&chunk),
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("capture stream closed");
                break;
            }
        }
    }
    pcm.truncate(wanted);
    pcm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_chunk_truncates_to_length() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..10 {
            tx.send(vec![7i16; 1000]).unwrap();
        }
        let fmt = AudioFormat {
            sample_rate_hz: 8_000,
            channels: 1,
        };
        let pcm = record_chunk(&rx, fmt, Duration::from_millis(500));
        assert_eq!(pcm.len(), 4_000);
    }

    #[test]
    fn test_record_chunk_stops_on_disconnect() {
        let (tx, rx) = mpsc::channel();
        tx.send(vec![1i16; 100]).unwrap();
        drop(tx);
        let pcm = record_chunk(&rx, AudioFormat::default(), Duration::from_secs(1));
        assert_eq!(pcm.len(), 100);
    }
}
