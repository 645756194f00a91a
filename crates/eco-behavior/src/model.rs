//! The `Behavior` trait: the main extension point for user code.

use eco_agent::{Agent, AgentState};

use crate::{BehaviorResult, Commands, StepContext};

/// Shorthand for the agent record a behaviour operates on.
pub type AgentOf<B> = Agent<<B as Behavior>::State, <B as Behavior>::Message>;

/// Pluggable agent behaviour.
///
/// One `Behavior` value drives every agent of a simulation; populations are
/// told apart through [`Agent::population`] and the agent's state.
///
/// # Thread safety
///
/// `act` is called for many agents in parallel, so implementations must be
/// `Send + Sync` and keep per-agent data in `Self::State`, not in `self`.
///
/// # Example
///
/// ```rust,ignore
/// struct Wander;
///
/// impl Behavior for Wander {
///     type State = ();
///     type Message = ();
///     type Heritage = ();
///
///     fn act(&self, agent: &mut AgentOf<Self>, _ctx: &StepContext<'_>, _cmds: &mut Commands<Self>) -> BehaviorResult<()> {
///         let turn = agent.rng.gen_range(-0.3..0.3);
///         agent.motion = Motion::new(turn, 0.2);
///         Ok(())
///     }
/// }
/// ```
pub trait Behavior: Send + Sync + Sized + 'static {
    type State: AgentState;
    /// Message content exchanged between agents.
    type Message: Send + Sync + 'static;
    /// Payload passed from parent to offspring on spawn.
    type Heritage: Send + 'static;

    /// Called once per step for every active agent.
    ///
    /// Set `agent.motion` to move during the movement sub-phase; queue
    /// births, deaths and messages on `cmds`.  An error aborts the step.
    fn act(
        &self,
        agent: &mut AgentOf<Self>,
        ctx: &StepContext<'_>,
        cmds: &mut Commands<Self>,
    ) -> BehaviorResult<()>;

    /// Apply an inheritance payload to a newborn, before its initializer
    /// runs.  Default: ignore it.
    fn inherit(&self, _agent: &mut AgentOf<Self>, _heritage: Self::Heritage) {}
}
