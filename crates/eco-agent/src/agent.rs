//! The agent record.
//!
//! # Lifecycle
//!
//! ```text
//!   pool borrow ──► activate(id, step) ──► act every step ──► deactivate ──► pool release
//!        ▲                                                                     │
//!        └──────────────────────── reset_from(prototype) ◄─────────────────────┘
//! ```
//!
//! Position and orientation are not stored here: the `Space` owns each
//! agent's projection and the agent keeps only the motion it requests for
//! the next movement sub-phase.

use std::sync::Arc;

use eco_core::{AgentId, AgentRng, Motion, PopulationKey, Step};

use crate::Message;

// ── AgentState ────────────────────────────────────────────────────────────────

/// Application-defined per-agent state.
///
/// Every population registers a prototype value; borrowed agents are reset
/// from it.  The default [`reset_from`](AgentState::reset_from) uses
/// `clone_from`, which lets collections reuse their allocations.
pub trait AgentState: Clone + Send + Sync + 'static {
    fn reset_from(&mut self, prototype: &Self) {
        self.clone_from(prototype);
    }
}

impl AgentState for () {
    fn reset_from(&mut self, _prototype: &Self) {}
}

// ── Agent ─────────────────────────────────────────────────────────────────────

pub struct Agent<S, M> {
    id: AgentId,
    population: PopulationKey,
    active: bool,
    birth_step: Step,
    incarnation: u32,
    inbox: Vec<Arc<Message<M>>>,

    /// Motion applied during the next movement sub-phase.  Persists across
    /// steps until the behaviour changes it.
    pub motion: Motion,
    pub rng: AgentRng,
    pub state: S,
}

impl<S: AgentState, M> Agent<S, M> {
    /// An inactive agent of `population`, used as a pool prototype.
    pub fn prototype(population: PopulationKey, state: S) -> Self {
        Self {
            id: AgentId::INVALID,
            population,
            active: false,
            birth_step: Step::ZERO,
            incarnation: 0,
            inbox: Vec::new(),
            motion: Motion::NONE,
            rng: AgentRng::default(),
            state,
        }
    }

    /// Restore every field to the prototype's value and count one more
    /// incarnation of this storage.
    pub fn reset_from(&mut self, prototype: &Self) {
        self.id = AgentId::INVALID;
        self.population.clone_from(&prototype.population);
        self.active = false;
        self.birth_step = Step::ZERO;
        self.inbox.clear();
        self.motion = prototype.motion;
        self.rng.clone_from(&prototype.rng);
        self.state.reset_from(&prototype.state);
        self.incarnation += 1;
    }
}

impl<S, M> Agent<S, M> {
    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn population(&self) -> &PopulationKey {
        &self.population
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[inline]
    pub fn birth_step(&self) -> Step {
        self.birth_step
    }

    /// Steps elapsed since activation.
    pub fn age(&self, now: Step) -> u64 {
        now.since(self.birth_step)
    }

    /// How many times this storage has been recycled by the pool.  Zero for
    /// a freshly cloned agent.
    #[inline]
    pub fn incarnation(&self) -> u32 {
        self.incarnation
    }

    /// Messages delivered in the previous step.
    pub fn inbox(&self) -> &[Arc<Message<M>>] {
        &self.inbox
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message<M>> {
        self.inbox.iter().map(|m| m.as_ref())
    }

    // ── Engine hooks ──────────────────────────────────────────────────────

    /// Stamp identity and birth step, seed the RNG for `id`, and mark the
    /// agent active.  Called by the engine right before space insertion.
    pub fn activate(&mut self, id: AgentId, step: Step, global_seed: u64) {
        self.id = id;
        self.birth_step = step;
        self.rng.reseed(global_seed, id);
        self.active = true;
    }

    /// Clear the activation flag, pending motion and inbox.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.motion = Motion::NONE;
        self.inbox.clear();
    }

    pub fn deliver(&mut self, message: Arc<Message<M>>) {
        self.inbox.push(message);
    }

    pub fn clear_inbox(&mut self) {
        self.inbox.clear();
    }
}

impl<S: Clone, M> Clone for Agent<S, M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            population: self.population.clone(),
            active: self.active,
            birth_step: self.birth_step,
            incarnation: self.incarnation,
            inbox: self.inbox.clone(),
            motion: self.motion,
            rng: self.rng.clone(),
            state: self.state.clone(),
        }
    }
}

impl<S: std::fmt::Debug, M> std::fmt::Debug for Agent<S, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("population", &self.population)
            .field("active", &self.active)
            .field("birth_step", &self.birth_step)
            .field("incarnation", &self.incarnation)
            .field("inbox", &self.inbox.len())
            .field("motion", &self.motion)
            .field("state", &self.state)
            .finish()
    }
}
