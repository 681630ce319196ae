use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

#[derive(Clone)]
pub struct PipelineMetrics {
    pub utterances: IntCounter,
    pub commands: IntCounter,
    pub waypoints: IntCounter,
    pub interpret_failures: IntCounter,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub pipeline: PipelineMetrics,
}

impl MetricsHub {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let pipeline = PipelineMetrics {
            utterances: IntCounter::new("spot_utterances", "Utterances interpreted")?,
            commands: IntCounter::new("spot_commands", "Commands produced by interpretation")?,
            waypoints: IntCounter::new("spot_waypoints", "Waypoints planned")?,
            interpret_failures: IntCounter::new(
                "spot_interpret_failures",
                "Utterances skipped after a model failure",
            )?,
        };
        registry.register(Box::new(pipeline.utterances.clone()))?;
        registry.register(Box::new(pipeline.commands.clone()))?;
        registry.register(Box::new(pipeline.waypoints.clone()))?;
        registry.register(Box::new(pipeline.interpret_failures.clone()))?;
        Ok(Self { registry, pipeline })
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_encode() {
        let hub = MetricsHub::new().unwrap();
        hub.pipeline.commands.inc_by(3);
        hub.pipeline.interpret_failures.inc();
        let text = hub.encode_text();
        assert!(text.contains("spot_commands 3"));
        assert!(text.contains("spot_interpret_failures 1"));
        assert!(text.contains("spot_waypoints 0"));
    }
}
