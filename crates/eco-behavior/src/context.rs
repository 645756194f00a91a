//! Read-only world view passed to every [`Behavior::act`](crate::Behavior::act) call.

use eco_core::{AgentId, Point2, Projection, SimConfig, Step};
use eco_space::{Entry, Space};

use crate::StepSnapshot;

/// Built once per step by the engine and shared immutably across all
/// execution tasks.  The engine allows no structural mutation of the space
/// while a `StepContext` is alive, so every agent sees the same world.
pub struct StepContext<'a> {
    pub step: Step,
    pub space: &'a Space,
    pub snapshot: &'a StepSnapshot,
    pub config: &'a SimConfig,
}

impl<'a> StepContext<'a> {
    #[inline]
    pub fn new(step: Step, space: &'a Space, snapshot: &'a StepSnapshot, config: &'a SimConfig) -> Self {
        Self { step, space, snapshot, config }
    }

    /// Current projection of `agent`.
    #[inline]
    pub fn projection(&self, agent: AgentId) -> Option<Projection> {
        self.space.projection(agent)
    }

    pub fn position(&self, agent: AgentId) -> Option<Point2> {
        self.space.projection(agent).map(|p| p.position)
    }

    /// Other agents within `radius` of `agent` with an unobstructed line of
    /// sight.
    pub fn visible_neighbours(&self, agent: AgentId, radius: f64) -> Vec<&'a Entry> {
        self.space.visible_neighbours(agent, radius)
    }

    /// Other agents within `radius` of `agent`, walls ignored.
    pub fn neighbours(&self, agent: AgentId, radius: f64) -> Vec<&'a Entry> {
        self.space.neighbours(agent, radius)
    }
}
