//! A behaviour whose agents never act.

use std::marker::PhantomData;

use eco_agent::AgentState;

use crate::{AgentOf, Behavior, BehaviorResult, Commands, StepContext};

/// A [`Behavior`] that leaves every agent untouched.
///
/// Useful in tests or for passive populations that only occupy space.
pub struct NoopBehavior<S = (), M = ()>(PhantomData<fn() -> (S, M)>);

impl<S, M> NoopBehavior<S, M> {
    pub fn new() -> Self {
        NoopBehavior(PhantomData)
    }
}

impl<S, M> Default for NoopBehavior<S, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AgentState, M: Send + Sync + 'static> Behavior for NoopBehavior<S, M> {
    type State = S;
    type Message = M;
    type Heritage = ();

    fn act(&self, _agent: &mut AgentOf<Self>, _ctx: &StepContext<'_>, _cmds: &mut Commands<Self>) -> BehaviorResult<()> {
        Ok(())
    }
}
