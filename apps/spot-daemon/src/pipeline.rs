//! One utterance at a time: interpret, plan, actuate.

use std::fmt::Display;
use std::future::Future;

use command_interpreter::{Command, CommandInterpreter, CommandKind, InterpretError, ToolCallModel};
use motion_control::MotionController;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use trajectory_planner::{Plan, Pose, TrajectoryPlanner};
use uuid::Uuid;
use voice_local::Transcript;

use crate::metrics::MetricsHub;

/// A transcript queued for processing.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub id: Uuid,
    pub transcript: Transcript,
}

impl Utterance {
    pub fn new(text: impl Into<String>, audio_ms: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            transcript: Transcript {
                text: text.into(),
                audio_ms,
                ts: Some(OffsetDateTime::now_utc()),
            },
        }
    }
}

/// What one utterance turned into.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub commands: Vec<Command>,
    pub plan: Plan,
    /// Waypoints the controller accepted
    pub goals_sent: usize,
}

/// Run `op` up to `1 + max_retries` times, returning the last error.
pub async fn with_retries<T, E, F, Fut>(max_retries: u32, what: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < max_retries => {
                attempt += 1;
                warn!(error = %e, attempt, "{what} failed; retrying");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Owns the pose state between utterances.
pub struct Pipeline<M, C> {
    interpreter: CommandInterpreter<M>,
    planner: TrajectoryPlanner,
    controller: C,
    pose: Pose,
    metrics: MetricsHub,
    max_retries: u32,
}

impl<M: ToolCallModel, C: MotionController> Pipeline<M, C> {
    pub fn new(
        interpreter: CommandInterpreter<M>,
        planner: TrajectoryPlanner,
        controller: C,
        metrics: MetricsHub,
        max_retries: u32,
    ) -> Self {
        Self {
            interpreter,
            planner,
            controller,
            pose: Pose::default(),
            metrics,
            max_retries,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn metrics(&self) -> &MetricsHub {
        &self.metrics
    }

    /// Process one utterance fully. A model failure skips the utterance and
    /// leaves the pose untouched.
    pub async fn handle(&mut self, utterance: &Utterance) -> Result<Outcome, InterpretError> {
        let text = utterance.transcript.text.as_str();
        let interpreter = &self.interpreter;
        let commands = with_retries(self.max_retries, "interpretation", || {
            interpreter.interpret(text)
        })
        .await
        .inspect_err(|_| self.metrics.pipeline.interpret_failures.inc())?;

        self.metrics.pipeline.utterances.inc();
        self.metrics.pipeline.commands.inc_by(commands.len() as u64);

        let plan = self.planner.plan(&commands, self.pose);
        self.pose = plan.pose;
        self.metrics.pipeline.waypoints.inc_by(plan.waypoints.len() as u64);
        debug!(
            waypoints = plan.waypoints.len(),
            position = %plan.pose.position,
            heading = %plan.pose.heading,
            "planned"
        );

        let goals_sent = self.actuate(&commands, &plan);
        Ok(Outcome {
            commands,
            plan,
            goals_sent,
        })
    }

    /// Send waypoints in order, then gestures in command order. A rejected
    /// goal aborts the remaining goals and gestures of this utterance.
    fn actuate(&mut self, commands: &[Command], plan: &Plan) -> usize {
        let controller = self.controller.name().to_string();
        for (i, wp) in plan.waypoints.iter().enumerate() {
            if let Err(e) = self.controller.move_to_goal(wp.x, wp.y) {
                warn!(%controller, error = %e, goal = %wp, "goal rejected; skipping the rest");
                return i;
            }
        }
        for cmd in commands.iter().filter(|c| c.kind.is_gesture()) {
            let res = match cmd.kind {
                CommandKind::Bow => self.controller.bow(),
                CommandKind::Dance => self.controller.dance(),
                _ => Ok(()),
            };
            if let Err(e) = res {
                warn!(%controller, error = %e, gesture = %cmd, "gesture failed");
            }
        }
        info!(%controller, goals = plan.waypoints.len(), "actuated");
        plan.waypoints.len()
    }
}
