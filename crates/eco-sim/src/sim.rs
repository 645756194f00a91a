//! The `Sim` struct and its step loop.

use std::sync::Arc;

use rayon::ThreadPool;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use eco_agent::{AgentPool, Message};
use eco_behavior::{Addition, AgentOf, Behavior, Commands, StepContext, StepSnapshot};
use eco_core::{AgentId, PopulationKey, SimConfig, Step};
use eco_space::Space;

use crate::{MutationQueues, SimError, SimObserver, SimResult, StepSummary};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Which kind of mutation is currently legal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Agents are executing; only enqueued requests are accepted.
    Planning,
    /// Queues are being drained into the world.
    Modification,
    /// Between steps.  Direct spawning is allowed.
    Idle,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The step engine.
///
/// Active agents live in a dense `Vec` in activation order; `slots` maps ids
/// to indices.  The execution phase hands out disjoint `&mut` chunks of that
/// vector to the worker pool, so agents never share mutable state.
///
/// Create via [`SimBuilder`](crate::SimBuilder).
pub struct Sim<B: Behavior> {
    pub(crate) config: SimConfig,
    pub(crate) behavior: B,
    pub(crate) space: Space,
    pub(crate) pool: AgentPool<B::State, B::Message>,
    pub(crate) agents: Vec<AgentOf<B>>,
    pub(crate) slots: FxHashMap<AgentId, usize>,
    pub(crate) queues: MutationQueues<B>,
    pub(crate) snapshot: StepSnapshot,
    pub(crate) workers: Arc<ThreadPool>,
    pub(crate) observer: Box<dyn SimObserver>,
    pub(crate) phase: Phase,
    pub(crate) step: Step,
    pub(crate) next_id: AgentId,
}

impl<B: Behavior> Sim<B> {
    // ── Driving ───────────────────────────────────────────────────────────

    /// Run one full step.
    ///
    /// # Errors
    ///
    /// A failing `Behavior::act` aborts the step after the barrier.  So does
    /// an addition, queued or produced by this step, with an unknown
    /// population or an out-of-bounds position.  Either way the commands of
    /// this step are discarded (events included), inboxes are kept, the
    /// queues hold exactly what they held before the call, the step counter
    /// is not advanced and the phase returns to [`Phase::Idle`].  State the
    /// agents changed inside `act` is not rolled back.
    ///
    /// A bad addition stays queued and fails every retry; take it out with
    /// [`discard_queued`](Self::discard_queued).
    pub fn next_step(&mut self) -> SimResult<StepSummary> {
        let now = self.step;
        self.observer.on_step_start(now);

        self.phase = Phase::Planning;
        let executed = self.agents.len();
        let mut cmds = match self.execute(now) {
            Ok(cmds) => cmds,
            Err(e) => {
                self.snapshot.clear();
                self.phase = Phase::Idle;
                return Err(e);
            }
        };
        if let Err(e) = self.validate_queued(&cmds) {
            warn!(step = %now, error = %e, "step discarded");
            self.snapshot.clear();
            self.phase = Phase::Idle;
            return Err(e);
        }
        for agent in &mut self.agents {
            agent.clear_inbox();
        }
        for event in cmds.events.drain(..) {
            self.observer.on_agent_event(now, &event);
        }
        self.queues.absorb(&mut cmds);

        self.phase = Phase::Modification;
        let result = self.modify(now);
        self.snapshot.clear();
        self.phase = Phase::Idle;

        let mut summary = result?;
        summary.executed = executed;
        self.step = now.next();
        self.observer.on_step_end(&summary);
        Ok(summary)
    }

    /// Run exactly `n` steps.
    pub fn run_steps(&mut self, n: u64) -> SimResult<()> {
        for _ in 0..n {
            self.next_step()?;
        }
        Ok(())
    }

    /// Run until `config.total_steps` steps have completed.
    pub fn run(&mut self) -> SimResult<()> {
        let end = self.config.end_step();
        while self.step < end {
            self.next_step()?;
        }
        Ok(())
    }

    // ── Mutation requests ─────────────────────────────────────────────────

    /// Create and activate an agent immediately.
    ///
    /// Only legal between steps; use [`enqueue_addition`](Self::enqueue_addition)
    /// from anywhere else.
    pub fn spawn(&mut self, addition: Addition<B>) -> SimResult<AgentId> {
        if self.phase != Phase::Idle {
            return Err(SimError::WrongPhase { expected: Phase::Idle, actual: self.phase });
        }
        self.validate_addition(&addition)?;
        self.ensure_ids(1)?;
        self.activate(addition, self.step)
    }

    /// Queue an agent for activation in the next modification phase.
    ///
    /// The addition is validated when that phase is reached, not here.
    pub fn enqueue_addition(&mut self, addition: Addition<B>) {
        self.queues.additions.push(addition);
    }

    /// Queue `agent` for removal.  Unknown or repeated ids are skipped
    /// when the queue is drained.
    pub fn enqueue_removal(&mut self, agent: AgentId) {
        self.queues.removals.push(agent);
    }

    /// Queue `message` for delivery at the start of the next modification
    /// phase.  It is readable during the step after that one.
    pub fn enqueue_delivery(&mut self, message: Message<B::Message>) {
        self.queues.deliveries.push(message);
    }

    /// Empty every mutation queue and return what was in it.
    ///
    /// The way out after [`next_step`](Self::next_step) rejected a queued
    /// addition.
    pub fn discard_queued(&mut self) -> MutationQueues<B> {
        let discarded = std::mem::take(&mut self.queues);
        if !discarded.is_empty() {
            debug!(requests = discarded.len(), "mutation queues discarded");
        }
        discarded
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Number of active agents.
    #[inline]
    pub fn count_agents(&self) -> usize {
        self.agents.len()
    }

    /// Number of active agents of `population`.
    pub fn count_agents_of(&self, population: impl Into<PopulationKey>) -> usize {
        self.space.count_population(&population.into())
    }

    /// The active agent with `id`, if any.
    pub fn agent(&self, id: AgentId) -> Option<&AgentOf<B>> {
        self.slots.get(&id).map(|&slot| &self.agents[slot])
    }

    /// Mutable access between steps, e.g. to set up initial state.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentOf<B>> {
        self.slots.get(&id).map(|&slot| &mut self.agents[slot])
    }

    /// Active agents in activation order.
    pub fn agents(&self) -> &[AgentOf<B>] {
        &self.agents
    }

    /// Positions, walls and spatial queries.
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Prototypes and recycled agent storage.
    pub fn pool(&self) -> &AgentPool<B::State, B::Message> {
        &self.pool
    }

    /// Requests waiting for the next modification phase.
    pub fn queues(&self) -> &MutationQueues<B> {
        &self.queues
    }

    /// The key-value store shared by agents during a step.  Always empty
    /// between steps.
    pub fn snapshot(&self) -> &StepSnapshot {
        &self.snapshot
    }

    /// The behaviour every agent runs.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// The validated run configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of completed steps.
    #[inline]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Current phase; [`Phase::Idle`] whenever control is back with the
    /// caller.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    // ── Execution phase ───────────────────────────────────────────────────

    /// Run `act` for every active agent, one worker task per chunk, and
    /// merge the task buffers in chunk order.
    fn execute(&mut self, now: Step) -> SimResult<Commands<B>> {
        let ctx = StepContext::new(now, &self.space, &self.snapshot, &self.config);
        let behavior = &self.behavior;
        let agents = &mut self.agents;
        let chunk = self.config.parallelization_threshold.max(1);

        let buffers = self.workers.install(|| {
            agents
                .par_chunks_mut(chunk)
                .map(|chunk| -> SimResult<Commands<B>> {
                    let mut cmds = Commands::new();
                    for agent in chunk {
                        behavior.act(agent, &ctx, &mut cmds)?;
                    }
                    Ok(cmds)
                })
                .collect::<SimResult<Vec<Commands<B>>>>()
        })?;

        let mut merged = Commands::new();
        for mut buffer in buffers {
            merged.append(&mut buffer);
        }
        Ok(merged)
    }

    // ── Modification phase ────────────────────────────────────────────────

    fn modify(&mut self, now: Step) -> SimResult<StepSummary> {
        let delivered = self.deliver();
        let removed = self.remove_queued(now);
        let moved = self.move_agents();
        let born = self.activate_queued(now)?;

        Ok(StepSummary {
            step: now,
            executed: 0,
            delivered,
            removed,
            moved,
            born,
            active: self.agents.len(),
        })
    }

    /// Hand each queued message to every active recipient.
    fn deliver(&mut self) -> usize {
        let queued = self.queues.deliveries.len();
        let mut delivered = 0;
        for message in self.queues.deliveries.drain(..) {
            let message = Arc::new(message);
            for &recipient in message.recipients() {
                match self.slots.get(&recipient) {
                    Some(&slot) => {
                        self.agents[slot].deliver(Arc::clone(&message));
                        delivered += 1;
                    }
                    None => trace!(%recipient, "delivery to inactive agent dropped"),
                }
            }
        }
        debug!(messages = queued, delivered, "deliveries drained");
        delivered
    }

    /// Deactivate every queued agent, return it to the pool, then compact
    /// the agent list and the space in one pass each.
    fn remove_queued(&mut self, now: Step) -> usize {
        if self.queues.removals.is_empty() {
            return 0;
        }
        let mut doomed: FxHashSet<AgentId> = FxHashSet::default();
        for id in self.queues.removals.drain(..) {
            if !self.slots.contains_key(&id) {
                warn!(agent = %id, "removal of inactive agent dropped");
            } else if !doomed.insert(id) {
                trace!(agent = %id, "duplicate removal dropped");
            }
        }
        if doomed.is_empty() {
            return 0;
        }

        let mut kept = Vec::with_capacity(self.agents.len() - doomed.len());
        for mut agent in self.agents.drain(..) {
            if !doomed.contains(&agent.id()) {
                kept.push(agent);
                continue;
            }
            let id = agent.id();
            agent.deactivate();
            self.observer.on_agent_removed(now, id, agent.population());
            if let Err(e) = self.pool.release(agent) {
                warn!(agent = %id, error = %e, "agent storage could not be pooled");
            }
        }
        self.agents = kept;
        self.reindex();

        let removed = self.space.remove_if(|entry| doomed.contains(&entry.id));
        debug!(removed, "removals drained");
        removed
    }

    /// Apply each agent's motion through the collision router, in parallel
    /// over disjoint chunks of the space's entries.
    fn move_agents(&mut self) -> usize {
        let agents = &self.agents;
        let slots = &self.slots;
        let space = &mut self.space;
        let chunk = self.config.parallelization_threshold;
        let moved = self.workers.install(|| {
            space.move_all(chunk, |id| slots.get(&id).map(|&slot| agents[slot].motion))
        });
        debug!(moved, "movement applied");
        moved
    }

    fn activate_queued(&mut self, now: Step) -> SimResult<usize> {
        let additions = std::mem::take(&mut self.queues.additions);
        let born = additions.len();
        for addition in additions {
            self.activate(addition, now)?;
        }
        debug!(born, "activations drained");
        Ok(born)
    }

    /// Borrow from the pool, inherit, initialize, insert, mark active.
    fn activate(&mut self, addition: Addition<B>, now: Step) -> SimResult<AgentId> {
        let Addition { population, projection, heritage, init } = addition;
        let mut agent = self.pool.borrow(&population)?;
        let id = self.allocate_id()?;
        agent.activate(id, now, self.config.seed);
        if let Some(heritage) = heritage {
            self.behavior.inherit(&mut agent, heritage);
        }
        if let Some(init) = init {
            init(&mut agent);
        }
        self.space.insert(id, population.clone(), projection)?;
        self.slots.insert(id, self.agents.len());
        self.agents.push(agent);
        self.observer.on_agent_created(now, id, &population);
        Ok(id)
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    /// Check every addition that the modification phase would activate:
    /// the queued ones followed by those in `cmds`.
    fn validate_queued(&self, cmds: &Commands<B>) -> SimResult<()> {
        for addition in self.queues.additions.iter().chain(&cmds.additions) {
            self.validate_addition(addition)?;
        }
        self.ensure_ids(self.queues.additions.len() + cmds.additions.len())
    }

    fn validate_addition(&self, addition: &Addition<B>) -> SimResult<()> {
        if !self.pool.contains(&addition.population) {
            return Err(SimError::UnknownPopulation(addition.population.clone()));
        }
        if !self.space.router().contains(addition.projection.position) {
            return Err(SimError::OutOfBounds {
                population: addition.population.clone(),
                point: addition.projection.position,
            });
        }
        Ok(())
    }

    /// Fail unless `n` more ids can be handed out.
    fn ensure_ids(&self, n: usize) -> SimResult<()> {
        let left = (AgentId::INVALID.0 - self.next_id.0) as usize;
        if n > left {
            return Err(SimError::IdsExhausted);
        }
        Ok(())
    }

    fn allocate_id(&mut self) -> SimResult<AgentId> {
        let id = self.next_id;
        if id == AgentId::INVALID {
            return Err(SimError::IdsExhausted);
        }
        self.next_id = id.next().unwrap_or(AgentId::INVALID);
        Ok(id)
    }

    fn reindex(&mut self) {
        self.slots.clear();
        self.slots.extend(self.agents.iter().enumerate().map(|(i, a)| (a.id(), i)));
    }
}
