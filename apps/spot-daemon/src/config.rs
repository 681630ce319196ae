use anyhow::Context;
use command_interpreter::{InterpreterConfig, OpenAiConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use trajectory_planner::MAX_WALK_DISTANCE_M;
use voice_local::TranscriptionConfig;

/// Daemon settings. Every field has a default so a partial YAML file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Length of one listening session
    pub session_secs: u64,
    /// Length of each recorded audio chunk
    pub chunk_secs: u64,
    /// Utterances buffered between capture and processing
    pub queue_depth: usize,
    /// Extra attempts for a failed transcription or model call
    pub max_retries: u32,
    /// Use a streaming recogniser instead of chunked transcription
    pub streaming: bool,
    pub max_walk_distance_m: f64,
    pub interpreter: InterpreterConfig,
    pub openai: OpenAiConfig,
    pub transcription: TranscriptionConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            session_secs: 30,
            chunk_secs: 5,
            queue_depth: 8,
            max_retries: 0,
            streaming: false,
            max_walk_distance_m: MAX_WALK_DISTANCE_M,
            interpreter: InterpreterConfig::default(),
            openai: OpenAiConfig::default(),
            transcription: TranscriptionConfig::default(),
        }
    }
}

pub fn load_config_file(path: impl AsRef<Path>) -> anyhow::Result<DaemonConfig> {
    let path = path.as_ref();
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("parsing yaml: {}", path.display()))
}

pub fn parse_config(raw: &str) -> anyhow::Result<DaemonConfig> {
    if raw.trim().is_empty() {
        return Ok(DaemonConfig::default());
    }
    let cfg: DaemonConfig = serde_yaml::from_str(raw)?;
    anyhow::ensure!(cfg.chunk_secs > 0, "chunk_secs must be positive");
    anyhow::ensure!(cfg.queue_depth > 0, "queue_depth must be positive");
    anyhow::ensure!(
        cfg.max_walk_distance_m.is_finite()
            && cfg.max_walk_distance_m > 0.0
            && cfg.max_walk_distance_m <= MAX_WALK_DISTANCE_M,
        "max_walk_distance_m must be in (0, {MAX_WALK_DISTANCE_M}], got {}",
        cfg.max_walk_distance_m
    );
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voice_local::WhisperEndpoint;

    #[test]
    fn test_empty_is_default() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, DaemonConfig::default());
        assert!(!cfg.streaming);
    }

    #[test]
    fn test_partial_yaml() {
        let cfg = parse_config(
            "session_secs: 60\n\
             max_retries: 2\n\
             streaming: true\n\
             openai:\n  model: gpt-4o-mini\n\
             transcription:\n  endpoint: transcriptions\n  language: en\n",
        )
        .unwrap();
        assert_eq!(cfg.session_secs, 60);
        assert_eq!(cfg.chunk_secs, 5);
        assert_eq!(cfg.max_retries, 2);
        assert!(cfg.streaming);
        assert_eq!(cfg.openai.model, "gpt-4o-mini");
        assert_eq!(cfg.openai.timeout_ms, OpenAiConfig::default().timeout_ms);
        assert_eq!(cfg.transcription.endpoint, WhisperEndpoint::Transcriptions);
        assert_eq!(cfg.transcription.language.as_deref(), Some("en"));
        assert_eq!(cfg.interpreter.tools.len(), 4);
    }

    #[test]
    fn test_rejects_zero_chunk() {
        assert!(parse_config("chunk_secs: 0").is_err());
    }

    #[test]
    fn test_rejects_bad_walk_limit() {
        for raw in [
            "max_walk_distance_m: -2.0",
            "max_walk_distance_m: 0",
            "max_walk_distance_m: .nan",
            "max_walk_distance_m: 10",
        ] {
            assert!(parse_config(raw).is_err(), "{raw}");
        }
        let cfg = parse_config("max_walk_distance_m: 1.5").unwrap();
        assert_eq!(cfg.max_walk_distance_m, 1.5);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_config_file("/nonexistent/spot.yaml").unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }
}
