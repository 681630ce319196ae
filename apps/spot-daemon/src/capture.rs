//! Producer side of the command loop: audio chunks in, utterances out.

use anyhow::Result;
use tokio::sync::mpsc::Sender;
use tracing::{debug, warn};
use voice_local::{encode_wav, AsrStream, AudioFormat, FinalSegments, Transcriber};

use crate::pipeline::{with_retries, Utterance};

/// Queue a transcript unless it is blank.
async fn enqueue(tx: &Sender<Utterance>, text: String, audio_ms: u64) -> Result<()> {
    let utterance = Utterance::new(text, audio_ms);
    if utterance.transcript.is_blank() {
        debug!(audio_ms, "blank transcript ignored");
        return Ok(());
    }
    debug!(id = %utterance.id, text = %utterance.transcript.text, "queued utterance");
    tx.send(utterance)
        .await
        .map_err(|_| anyhow::anyhow!("processing task stopped"))
}

async fn transcribe_chunk(
    transcriber: &dyn Transcriber,
    pcm: &[i16],
    format: AudioFormat,
    max_retries: u32,
    tx: &Sender<Utterance>,
) -> Result<()> {
    let wav = encode_wav(pcm, format)?;
    let audio_ms = format.duration_ms(pcm.len());
    match with_retries(max_retries, "transcription", || transcriber.transcribe(&wav)).await {
        Ok(text) => enqueue(tx, text, audio_ms).await,
        Err(e) => {
            warn!(backend = transcriber.name(), error = %e, "transcription failed; chunk dropped");
            Ok(())
        }
    }
}

/// Feed `count` silent chunks through a scripted transcriber.
pub async fn produce_scripted(
    transcriber: &dyn Transcriber,
    count: usize,
    max_retries: u32,
    tx: &Sender<Utterance>,
) -> Result<()> {
    let format = AudioFormat::default();
    let silence = vec![0i16; format.sample_rate_hz as usize / 10];
    for _ in 0..count {
        transcribe_chunk(transcriber, &silence, format, max_retries, tx).await?;
    }
    Ok(())
}

/// Push PCM chunks through a streaming recogniser, queueing each final
/// segment as it appears. Interim and empty segments never reach the queue.
pub async fn produce_streaming<I>(
    stream: Box<dyn AsrStream>,
    chunks: I,
    tx: &Sender<Utterance>,
) -> Result<()>
where
    I: IntoIterator<Item = Vec<i16>>,
{
    let mut stream = FinalSegments::new(stream);
    for pcm in chunks {
        stream.push_audio(&pcm);
        while let Some(seg) = stream.poll() {
            enqueue(tx, seg.text, seg.end_ms.saturating_sub(seg.start_ms)).await?;
        }
    }
    stream.finish();
    while let Some(seg) = stream.poll() {
        enqueue(tx, seg.text, seg.end_ms.saturating_sub(seg.start_ms)).await?;
    }
    debug!(backend = stream.name(), dropped = stream.dropped(), "stream finished");
    Ok(())
}

/// Record fixed-length chunks from the default microphone until `deadline`.
#[cfg(feature = "audio")]
pub async fn produce_live(
    transcriber: &dyn Transcriber,
    chunk: std::time::Duration,
    max_retries: u32,
    deadline: tokio::time::Instant,
    tx: &Sender<Utterance>,
) -> Result<()> {
    use tracing::info;
    use voice_local::mic;

    let (_stream, format, rx) = mic::start_default_input()?;
    info!(
        sample_rate = format.sample_rate_hz,
        chunk_secs = chunk.as_secs(),
        "microphone started"
    );
    while tokio::time::Instant::now() < deadline {
        let pcm = tokio::task::block_in_place(|| mic::record_chunk(&rx, format, chunk));
        if pcm.is_empty() {
            warn!("no audio captured; stopping");
            break;
        }
        transcribe_chunk(transcriber, &pcm, format, max_retries, tx).await?;
    }
    Ok(())
}

#[cfg(not(feature = "audio"))]
pub async fn produce_live(
    _transcriber: &dyn Transcriber,
    _chunk: std::time::Duration,
    _max_retries: u32,
    _deadline: tokio::time::Instant,
    _tx: &Sender<Utterance>,
) -> Result<()> {
    anyhow::bail!("built without the `audio` feature; use --mock or rebuild with --features audio")
}
