use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, info_span, warn, Instrument};

use command_interpreter::{
    CommandInterpreter, OpenAiToolModel, ScriptedToolModel, ToolCallModel, ToolInvocation,
};
use motion_control::{MockController, MotionController};
use trajectory_planner::TrajectoryPlanner;
use voice_local::{new_asr_stream, new_transcriber, AudioFormat, Transcriber, TranscriberKind, MOCK_SEGMENT_MS};

mod capture;
mod config;
mod metrics;
mod pipeline;

use config::{load_config_file, DaemonConfig};
use metrics::MetricsHub;
use pipeline::{Pipeline, Utterance};

#[derive(Parser)]
#[command(name = "spot-daemon")]
#[command(about = "Spot voice command loop: listen, interpret, plan, move")]
struct Args {
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay --utterance values instead of recording the microphone
    #[arg(long)]
    mock: bool,

    /// Utterance to replay in --mock mode (repeatable)
    #[arg(long = "utterance")]
    utterances: Vec<String>,

    /// Tool call returned for every utterance instead of asking the chat API,
    /// e.g. 'walk_command {"direction":"forward","distance":1}' (repeatable)
    #[arg(long = "mock-call")]
    mock_calls: Vec<String>,

    /// Session length in seconds
    #[arg(long)]
    session_secs: Option<u64>,

    /// Recorded chunk length in seconds
    #[arg(long)]
    chunk_secs: Option<u64>,

    /// Retries for a failed transcription or model call
    #[arg(long)]
    max_retries: Option<u32>,

    /// Stream audio through an incremental recogniser instead of
    /// transcribing fixed-length chunks
    #[arg(long)]
    stream: bool,
}

impl Args {
    fn apply(&self, cfg: &mut DaemonConfig) {
        if let Some(v) = self.session_secs {
            cfg.session_secs = v;
        }
        if let Some(v) = self.chunk_secs {
            cfg.chunk_secs = v.max(1);
        }
        if let Some(v) = self.max_retries {
            cfg.max_retries = v;
        }
        if self.stream {
            cfg.streaming = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();

    let args = Args::parse();
    let mut cfg = match &args.config {
        Some(path) => load_config_file(path)?,
        None => DaemonConfig::default(),
    };
    args.apply(&mut cfg);

    info!("spot-daemon starting");
    info!(
        session_secs = cfg.session_secs,
        chunk_secs = cfg.chunk_secs,
        max_retries = cfg.max_retries,
        streaming = cfg.streaming,
        mock = args.mock,
        "configuration"
    );

    let metrics = MetricsHub::new().map_err(|e| anyhow::anyhow!("metrics init error: {e}"))?;

    let model: Box<dyn ToolCallModel> = if args.mock_calls.is_empty() {
        Box::new(OpenAiToolModel::new(cfg.openai.clone()).context("creating chat model")?)
    } else {
        let calls = args
            .mock_calls
            .iter()
            .map(|s| s.parse::<ToolInvocation>())
            .collect::<Result<Vec<_>, _>>()
            .context("parsing --mock-call")?;
        Box::new(ScriptedToolModel::new(calls))
    };

    let kind = if args.mock {
        TranscriberKind::Mock
    } else {
        TranscriberKind::Whisper
    };
    let transcriber = new_transcriber(kind, cfg.transcription.clone(), args.utterances.clone())
        .context("creating transcriber")?;
    if args.mock && args.utterances.is_empty() {
        warn!("--mock given without --utterance; nothing to replay");
    }

    let controller = MockController::new();
    info!(
        model = model.name(),
        transcriber = transcriber.name(),
        controller = controller.name(),
        "backends ready"
    );

    let pipeline = Pipeline::new(
        CommandInterpreter::new(cfg.interpreter.clone(), model),
        TrajectoryPlanner::new(cfg.max_walk_distance_m),
        controller,
        metrics,
        cfg.max_retries,
    );

    let (tx, rx) = mpsc::channel::<Utterance>(cfg.queue_depth.max(1));
    let consumer = tokio::spawn(run_consumer(pipeline, rx));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(cfg.session_secs);
    let produce = async {
        if cfg.streaming {
            let format = AudioFormat::default();
            let stream = new_asr_stream(kind, format, args.utterances.clone())
                .context("creating streaming recogniser")?;
            // 100 ms of silence per step, enough to cover every scripted utterance
            let steps = args.utterances.len() * (MOCK_SEGMENT_MS / 100) as usize;
            let tenth = vec![0i16; format.sample_rate_hz as usize / 10];
            capture::produce_streaming(stream, std::iter::repeat(tenth).take(steps), &tx).await
        } else if args.mock {
            capture::produce_scripted(&*transcriber, args.utterances.len(), cfg.max_retries, &tx)
                .await
        } else {
            capture::produce_live(
                &*transcriber,
                Duration::from_secs(cfg.chunk_secs),
                cfg.max_retries,
                deadline,
                &tx,
            )
            .await
        }
    };

    tokio::select! {
        res = tokio::time::timeout_at(deadline, produce) => match res {
            Ok(r) => r?,
            Err(_) => info!("session time limit reached"),
        },
        _ = tokio::signal::ctrl_c() => info!("interrupted; draining queue"),
    }
    drop(tx);

    let pipeline = consumer.await.context("processing task panicked")?;
    let pose = pipeline.pose();
    info!(
        position = %pose.position,
        heading = %pose.heading,
        actuations = pipeline.controller().events().len(),
        "session finished"
    );
    debug!("metrics:\n{}", pipeline.metrics().encode_text());

    info!("spot-daemon shutting down");
    Ok(())
}

async fn run_consumer<M, C>(
    mut pipeline: Pipeline<M, C>,
    mut rx: mpsc::Receiver<Utterance>,
) -> Pipeline<M, C>
where
    M: ToolCallModel,
    C: MotionController,
{
    while let Some(utterance) = rx.recv().await {
        let span = info_span!("utterance", id = %utterance.id);
        async {
            info!(text = %utterance.transcript.text, "processing");
            match pipeline.handle(&utterance).await {
                Ok(out) => info!(
                    commands = out.commands.len(),
                    goals = out.goals_sent,
                    "utterance done"
                ),
                Err(e) => warn!(error = %e, "interpretation failed; utterance skipped"),
            }
        }
        .instrument(span)
        .await;
    }
    pipeline
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
