//! Deferred world mutations requested during the execution phase.
//!
//! Each execution task owns one [`Commands`] buffer.  After the barrier the
//! engine concatenates the buffers in chunk order and drains them in the
//! MODIFICATION phase, so requests from one task stay in the order they were
//! made.

use eco_agent::Message;
use eco_core::{AgentId, PopulationKey, Projection};

use crate::{AgentOf, Behavior};

/// One-shot callback run on a newborn after inheritance and before it is
/// placed in the space.
pub type Initializer<B> = Box<dyn FnOnce(&mut AgentOf<B>) + Send>;

// ── Addition ──────────────────────────────────────────────────────────────────

/// A request to create an agent of `population` at `projection`.
pub struct Addition<B: Behavior> {
    pub population: PopulationKey,
    pub projection: Projection,
    pub heritage: Option<B::Heritage>,
    pub init: Option<Initializer<B>>,
}

impl<B: Behavior> Addition<B> {
    pub fn new(population: impl Into<PopulationKey>, projection: Projection) -> Self {
        Self { population: population.into(), projection, heritage: None, init: None }
    }

    pub fn with_heritage(mut self, heritage: B::Heritage) -> Self {
        self.heritage = Some(heritage);
        self
    }

    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: FnOnce(&mut AgentOf<B>) + Send + 'static,
    {
        self.init = Some(Box::new(init));
        self
    }
}

impl<B: Behavior> std::fmt::Debug for Addition<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Addition")
            .field("population", &self.population)
            .field("projection", &self.projection)
            .field("heritage", &self.heritage.is_some())
            .field("init", &self.init.is_some())
            .finish()
    }
}

// ── AgentEvent ────────────────────────────────────────────────────────────────

/// A free-form notification from an agent, forwarded to the observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentEvent {
    pub agent: AgentId,
    pub source: &'static str,
    pub message: String,
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Per-task append-only mutation buffer.
pub struct Commands<B: Behavior> {
    pub additions: Vec<Addition<B>>,
    pub removals: Vec<AgentId>,
    pub deliveries: Vec<Message<B::Message>>,
    pub events: Vec<AgentEvent>,
}

impl<B: Behavior> Commands<B> {
    pub fn new() -> Self {
        Self { additions: Vec::new(), removals: Vec::new(), deliveries: Vec::new(), events: Vec::new() }
    }

    /// Queue the birth of a new agent.
    pub fn spawn(&mut self, addition: Addition<B>) {
        self.additions.push(addition);
    }

    /// Queue the removal of `agent` (possibly the calling agent itself).
    pub fn remove(&mut self, agent: AgentId) {
        self.removals.push(agent);
    }

    /// Queue a message for delivery.
    pub fn send(&mut self, message: Message<B::Message>) {
        self.deliveries.push(message);
    }

    /// Record an event for the observer.
    pub fn log_event(&mut self, agent: AgentId, source: &'static str, message: impl Into<String>) {
        self.events.push(AgentEvent { agent, source, message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
            && self.removals.is_empty()
            && self.deliveries.is_empty()
            && self.events.is_empty()
    }

    /// Move every request of `other` to the end of `self`.
    pub fn append(&mut self, other: &mut Commands<B>) {
        self.additions.append(&mut other.additions);
        self.removals.append(&mut other.removals);
        self.deliveries.append(&mut other.deliveries);
        self.events.append(&mut other.events);
    }
}

impl<B: Behavior> Default for Commands<B> {
    fn default() -> Self {
        Self::new()
    }
}
