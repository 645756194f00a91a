//! Deferred mutation queues drained once per step.

use eco_agent::Message;
use eco_behavior::{Addition, Behavior, Commands};
use eco_core::AgentId;

/// Additions, removals and deliveries waiting for the next MODIFICATION
/// phase.  Each queue is FIFO in enqueue order.
pub struct MutationQueues<B: Behavior> {
    pub(crate) additions: Vec<Addition<B>>,
    pub(crate) removals: Vec<AgentId>,
    pub(crate) deliveries: Vec<Message<B::Message>>,
}

impl<B: Behavior> MutationQueues<B> {
    pub fn new() -> Self {
        Self { additions: Vec::new(), removals: Vec::new(), deliveries: Vec::new() }
    }

    /// Move the mutation requests of `cmds` to the back of the queues.
    /// Events are not queued; `cmds.events` is left untouched.
    pub fn absorb(&mut self, cmds: &mut Commands<B>) {
        self.additions.append(&mut cmds.additions);
        self.removals.append(&mut cmds.removals);
        self.deliveries.append(&mut cmds.deliveries);
    }

    pub fn additions(&self) -> &[Addition<B>] {
        &self.additions
    }

    pub fn removals(&self) -> &[AgentId] {
        &self.removals
    }

    pub fn deliveries(&self) -> &[Message<B::Message>] {
        &self.deliveries
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty() && self.deliveries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.additions.len() + self.removals.len() + self.deliveries.len()
    }
}

impl<B: Behavior> Default for MutationQueues<B> {
    fn default() -> Self {
        Self::new()
    }
}
