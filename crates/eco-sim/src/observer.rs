//! Observer hooks for progress reporting and telemetry.
//!
//! Observer methods return `()`: the engine treats them as fire-and-forget
//! and nothing an observer does can abort a step.

use tracing::{debug, info};

use eco_behavior::AgentEvent;
use eco_core::{AgentId, PopulationKey, Step};

/// What happened during one completed step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub step: Step,
    /// Agents that ran `Behavior::act`.
    pub executed: usize,
    /// Inbox deliveries made (one per recipient).
    pub delivered: usize,
    pub removed: usize,
    /// Agents whose projection changed.
    pub moved: usize,
    pub born: usize,
    /// Active agents after the step.
    pub active: usize,
}

/// Callbacks invoked by [`Sim`](crate::Sim) at step boundaries and on agent
/// lifecycle changes.
///
/// All methods default to no-ops so implementors only override what they
/// care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress { every: u64 }
///
/// impl SimObserver for Progress {
///     fn on_step_end(&mut self, summary: &StepSummary) {
///         if summary.step.0 % self.every == 0 {
///             println!("{}: {} agents", summary.step, summary.active);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    fn on_step_start(&mut self, _step: Step) {}

    fn on_step_end(&mut self, _summary: &StepSummary) {}

    fn on_agent_created(&mut self, _step: Step, _agent: AgentId, _population: &PopulationKey) {}

    fn on_agent_removed(&mut self, _step: Step, _agent: AgentId, _population: &PopulationKey) {}

    /// An event logged by an agent through `Commands::log_event`.
    fn on_agent_event(&mut self, _step: Step, _event: &AgentEvent) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Forwards every hook to `tracing`.
pub struct TracingObserver;

impl SimObserver for TracingObserver {
    fn on_step_end(&mut self, s: &StepSummary) {
        debug!(
            step = %s.step,
            executed = s.executed,
            delivered = s.delivered,
            removed = s.removed,
            moved = s.moved,
            born = s.born,
            active = s.active,
            "step complete"
        );
    }

    fn on_agent_created(&mut self, step: Step, agent: AgentId, population: &PopulationKey) {
        debug!(%step, %agent, %population, "agent created");
    }

    fn on_agent_removed(&mut self, step: Step, agent: AgentId, population: &PopulationKey) {
        debug!(%step, %agent, %population, "agent removed");
    }

    fn on_agent_event(&mut self, step: Step, event: &AgentEvent) {
        info!(%step, agent = %event.agent, source = event.source, "{}", event.message);
    }
}
