use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing::info;

use command_interpreter::{
    default_tools, parse_commands, Command, CommandInterpreter, InterpreterConfig, OpenAiConfig,
    OpenAiToolModel, ScriptedToolModel, ToolCallModel, ToolInvocation,
};
use trajectory_planner::{Plan, Pose, TrajectoryPlanner, Vec2, MAX_WALK_DISTANCE_M};
use voice_local::{Transcriber, TranscriptionConfig, WhisperEndpoint, WhisperTranscriber};

#[derive(Parser, Debug)]
#[command(
    name = "spot",
    version,
    about = "Spot voice command tools",
    disable_help_subcommand = true
)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Endpoint {
    Translations,
    Transcriptions,
}

impl From<Endpoint> for WhisperEndpoint {
    fn from(e: Endpoint) -> Self {
        match e {
            Endpoint::Translations => WhisperEndpoint::Translations,
            Endpoint::Transcriptions => WhisperEndpoint::Transcriptions,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse command lines (args or stdin) into JSON commands
    Parse {
        /// Command line such as "WALK forward 2 0" (repeatable; stdin when absent)
        #[arg(long = "line")]
        lines: Vec<String>,
    },
    /// Parse command lines and plan waypoints from a start pose
    Plan {
        #[arg(long = "line")]
        lines: Vec<String>,
        /// Start position, metres forward
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,
        /// Start position, metres left
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
        /// Start heading x component
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        hx: f64,
        /// Start heading y component
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        hy: f64,
        /// Per-command walk limit in metres
        #[arg(long, default_value_t = MAX_WALK_DISTANCE_M, value_parser = walk_limit)]
        max_walk: f64,
    },
    /// Interpret an utterance with the chat model (or scripted tool calls)
    Interpret {
        /// Utterance text, e.g. "Spot, walk forward two meters"
        utterance: String,
        /// Scripted tool call instead of the chat API (repeatable),
        /// e.g. 'turn_command {"direction":"left","angle":90}'
        #[arg(long = "mock-call")]
        mock_calls: Vec<String>,
        /// Chat model name
        #[arg(long)]
        model: Option<String>,
        /// OpenAI-compatible API base URL
        #[arg(long)]
        api_base: Option<String>,
        /// Also plan waypoints from the default pose
        #[arg(long, action = ArgAction::SetTrue)]
        plan: bool,
    },
    /// Transcribe a WAV file with Whisper
    Transcribe {
        /// WAV file path
        file: PathBuf,
        #[arg(long, value_enum, default_value = "translations")]
        endpoint: Endpoint,
        /// Language hint (transcriptions endpoint only)
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        api_base: Option<String>,
    },
    /// Record the default microphone to a WAV file
    Record {
        /// Seconds to record
        #[arg(long, default_value_t = 5u64)]
        duration: u64,
        #[arg(long, default_value = "utterance.wav")]
        out: PathBuf,
    },
    /// Print the tool menu as sent to the chat API
    Tools,
}

#[derive(Serialize)]
struct InterpretOutput {
    utterance: String,
    lines: Vec<String>,
    commands: Vec<Command>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<Plan>,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    let pretty = cli.pretty;
    match cli.command {
        Commands::Parse { lines } => {
            let commands = parse_commands(&collect_lines(lines)?);
            print_json(&commands, pretty)
        }
        Commands::Plan {
            lines,
            x,
            y,
            hx,
            hy,
            max_walk,
        } => {
            let commands = parse_commands(&collect_lines(lines)?);
            let start = Pose::new(Vec2::new(x, y), Vec2::new(hx, hy));
            let plan = TrajectoryPlanner::new(max_walk).plan(&commands, start);
            print_json(&plan, pretty)
        }
        Commands::Interpret {
            utterance,
            mock_calls,
            model,
            api_base,
            plan,
        } => {
            let output = interpret(utterance, &mock_calls, model, api_base, plan).await?;
            print_json(&output, pretty)
        }
        Commands::Transcribe {
            file,
            endpoint,
            language,
            api_base,
        } => transcribe(&file, endpoint, language, api_base).await,
        Commands::Record { duration, out } => record(duration, &out),
        Commands::Tools => {
            let tools: Vec<_> = default_tools().iter().map(|t| t.to_openai_json()).collect();
            print_json(&tools, pretty)
        }
    }
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn walk_limit(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if v.is_finite() && v > 0.0 && v <= MAX_WALK_DISTANCE_M {
        Ok(v)
    } else {
        Err(format!("must be in (0, {MAX_WALK_DISTANCE_M}]"))
    }
}

/// Lines given on the command line, or stdin when there are none.
fn collect_lines(lines: Vec<String>) -> Result<Vec<String>> {
    if !lines.is_empty() {
        return Ok(lines);
    }
    read_lines(io::stdin().lock())
}

fn read_lines(reader: impl BufRead) -> Result<Vec<String>> {
    reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .context("reading command lines")
}

fn scripted_model(mock_calls: &[String]) -> Result<ScriptedToolModel> {
    let calls = mock_calls
        .iter()
        .map(|s| s.parse::<ToolInvocation>())
        .collect::<Result<Vec<_>, _>>()
        .context("parsing --mock-call")?;
    Ok(ScriptedToolModel::new(calls))
}

async fn interpret(
    utterance: String,
    mock_calls: &[String],
    model: Option<String>,
    api_base: Option<String>,
    with_plan: bool,
) -> Result<InterpretOutput> {
    let backend: Box<dyn ToolCallModel> = if mock_calls.is_empty() {
        let mut cfg = OpenAiConfig::default();
        if let Some(m) = model {
            cfg.model = m;
        }
        if let Some(b) = api_base {
            cfg.api_base = b;
        }
        Box::new(OpenAiToolModel::new(cfg)?)
    } else {
        Box::new(scripted_model(mock_calls)?)
    };
    info!(model = backend.name(), "interpreting");

    let interpreter = CommandInterpreter::new(InterpreterConfig::default(), backend);
    let lines = interpreter.command_lines(&utterance).await?;
    let commands = parse_commands(&lines);
    let plan = with_plan.then(|| trajectory_planner::plan(&commands, Pose::default()));
    Ok(InterpretOutput {
        utterance,
        lines,
        commands,
        plan,
    })
}

async fn transcribe(
    file: &Path,
    endpoint: Endpoint,
    language: Option<String>,
    api_base: Option<String>,
) -> Result<()> {
    let wav = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let mut cfg = TranscriptionConfig {
        endpoint: endpoint.into(),
        language,
        ..Default::default()
    };
    if let Some(b) = api_base {
        cfg.api_base = b;
    }
    let transcriber = WhisperTranscriber::new(cfg)?;
    let text = transcriber.transcribe(&wav).await?;
    println!("{text}");
    Ok(())
}

fn record(duration: u64, out: &Path) -> Result<()> {
    #[cfg(feature = "audio")]
    {
        use voice_local::{mic, write_wav_file};

        let (_stream, format, rx) = mic::start_default_input()?;
        let pcm = mic::record_chunk(&rx, format, std::time::Duration::from_secs(duration));
        write_wav_file(out, &pcm, format)?;
        println!(
            "recorded {} ms to {} at {} Hz",
            format.duration_ms(pcm.len()),
            out.display(),
            format.sample_rate_hz
        );
        Ok(())
    }
    #[cfg(not(feature = "audio"))]
    {
        let _ = (duration, out);
        anyhow::bail!("audio capture requires --features audio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_lines_from_reader() {
        let input = "WALK forward 2 0\nTURN left 90\n\nBOW\n";
        let lines = read_lines(input.as_bytes()).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(parse_commands(&lines).len(), 3);
    }

    #[tokio::test]
    async fn test_interpret_with_scripted_calls() {
        let calls = vec![
            r#"walk_command {"direction":"forward","distance":4,"duration":0}"#.to_string(),
            "dance_command".to_string(),
        ];
        let out = interpret("Spot, walk and dance".into(), &calls, None, None, true)
            .await
            .unwrap();
        assert_eq!(out.lines, vec!["WALK forward 4 0", "DUST_OFF"]);
        assert_eq!(out.commands.len(), 2);
        let plan = out.plan.unwrap();
        assert_eq!(plan.waypoints, vec![Vec2::new(3.0, 0.0)]);

        let json = serde_json::to_value(&out.commands).unwrap();
        assert_eq!(json[0]["command"], "WALK");
        assert_eq!(json[1]["command"], "DUST_OFF");
    }

    #[test]
    fn test_walk_limit_is_validated() {
        for bad in ["-2", "0", "NaN", "inf", "4"] {
            let res = Cli::try_parse_from(["spot", "plan", "--line", "BOW", "--max-walk", bad]);
            assert!(res.is_err(), "{bad}");
        }
        let cli =
            Cli::try_parse_from(["spot", "plan", "--line", "BOW", "--max-walk", "1.5"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan { max_walk, .. } if max_walk == 1.5));
    }

    #[test]
    fn test_bad_mock_call() {
        assert!(scripted_model(&["walk_command {".to_string()]).is_err());
    }

    #[test]
    fn test_cli_parses_negative_pose() {
        let cli = Cli::try_parse_from([
            "spot", "plan", "--line", "WALK forward 1 0", "--x", "-2", "--hy", "-1", "--hx", "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Plan { x, hy, lines, .. } => {
                assert_eq!(x, -2.0);
                assert_eq!(hy, -1.0);
                assert_eq!(lines.len(), 1);
            }
            other => unreachable!("unexpected {other:?}"),
        }
    }
}
