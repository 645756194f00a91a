//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};
use rustc_hash::FxHashMap;
use tracing::info;

use eco_agent::AgentPool;
use eco_behavior::{Behavior, StepSnapshot};
use eco_core::{AgentId, PopulationKey, SimConfig, Step};
use eco_space::{Direction, Space, TileGrid, WallSpec};

use crate::{MutationQueues, NoopObserver, Phase, Sim, SimError, SimObserver, SimResult};

/// Fluent builder for [`Sim<B>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: grid size, parallelization threshold, thread count, seed
/// - `B: Behavior`: the behaviour implementation
///
/// # Optional inputs
///
/// | Method               | Default                                     |
/// |----------------------|---------------------------------------------|
/// | `.walls(v)`          | No walls besides the grid border            |
/// | `.grid(g)`           | Open `width × height` grid from the config  |
/// | `.workers(p)`        | New pool with `config.num_threads` threads  |
/// | `.prototype(k, s)`   | No populations (every addition fails)       |
/// | `.capacity(k, n)`    | Empty free lists                            |
/// | `.observer(o)`       | [`NoopObserver`]                            |
pub struct SimBuilder<B: Behavior> {
    config: SimConfig,
    behavior: B,
    grid: Option<TileGrid>,
    walls: Vec<WallSpec>,
    workers: Option<Arc<ThreadPool>>,
    prototypes: Vec<(PopulationKey, B::State)>,
    capacities: Vec<(PopulationKey, usize)>,
    observer: Option<Box<dyn SimObserver>>,
}

impl<B: Behavior> SimBuilder<B> {
    pub fn new(config: SimConfig, behavior: B) -> Self {
        Self {
            config,
            behavior,
            grid: None,
            walls: Vec::new(),
            workers: None,
            prototypes: Vec::new(),
            capacities: Vec::new(),
            observer: None,
        }
    }

    /// Use a pre-built grid.  Its size must match the config.
    pub fn grid(mut self, grid: TileGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Add walls, e.g. from [`eco_space::load_walls_csv`].
    pub fn walls(mut self, walls: impl IntoIterator<Item = WallSpec>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn wall(mut self, x: u32, y: u32, direction: Direction) -> Self {
        self.walls.push(WallSpec::new(x, y, direction));
        self
    }

    /// Share an existing worker pool instead of building one.
    pub fn workers(mut self, workers: Arc<ThreadPool>) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Register the prototype state for `population`.
    pub fn prototype(mut self, population: impl Into<PopulationKey>, state: B::State) -> Self {
        self.prototypes.push((population.into(), state));
        self
    }

    /// Pre-allocate `capacity` pooled agents for `population`.
    pub fn capacity(mut self, population: impl Into<PopulationKey>, capacity: usize) -> Self {
        self.capacities.push((population.into(), capacity));
        self
    }

    pub fn observer(mut self, observer: impl SimObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Validate inputs, build the space, pool and worker pool, and return a
    /// ready-to-run [`Sim`] at step zero.
    pub fn build(self) -> SimResult<Sim<B>> {
        self.config.validate()?;

        // ── Space ─────────────────────────────────────────────────────────
        let mut grid = match self.grid {
            Some(grid) => {
                if (grid.width(), grid.height()) != (self.config.width, self.config.height) {
                    return Err(SimError::Config(format!(
                        "grid is {}×{} but the config says {}×{}",
                        grid.width(),
                        grid.height(),
                        self.config.width,
                        self.config.height
                    )));
                }
                grid
            }
            None => TileGrid::new(self.config.width, self.config.height)?,
        };
        grid.apply_walls(&self.walls)?;

        // ── Agent pool ────────────────────────────────────────────────────
        let mut pool = AgentPool::new();
        for (population, state) in self.prototypes {
            pool.register(population, state);
        }
        let mut capacities: FxHashMap<PopulationKey, usize> = FxHashMap::default();
        for (population, capacity) in self.capacities {
            *capacities.entry(population).or_default() += capacity;
        }
        for (population, capacity) in &capacities {
            pool.with_capacity(population, *capacity)?;
        }

        // ── Worker pool ───────────────────────────────────────────────────
        let workers = match self.workers {
            Some(workers) => workers,
            None => Arc::new(
                ThreadPoolBuilder::new()
                    .num_threads(self.config.num_threads.unwrap_or(0))
                    .thread_name(|i| format!("eco-worker-{i}"))
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
        };

        info!(
            width = self.config.width,
            height = self.config.height,
            walls = self.walls.len(),
            threads = workers.current_num_threads(),
            threshold = self.config.parallelization_threshold,
            "simulation built"
        );

        Ok(Sim {
            space: Space::with_grid(grid),
            config: self.config,
            behavior: self.behavior,
            pool,
            agents: Vec::new(),
            slots: FxHashMap::default(),
            queues: MutationQueues::new(),
            snapshot: StepSnapshot::new(),
            workers,
            observer: self.observer.unwrap_or_else(|| Box::new(NoopObserver) as Box<dyn SimObserver>),
            phase: Phase::Idle,
            step: Step::ZERO,
            next_id: AgentId(0),
        })
    }
}
