//! foraging: predator/prey demo for the rust_eco engine.
//!
//! Foragers graze, split when well fed and warn each other when a hunter
//! comes into view; a warned forager runs from the hunter on the next step.
//! Hunters chase the nearest visible forager and eat it on contact.  Both
//! starve when their energy runs out.  The arena is a walled room loaded
//! from an embedded CSV.
//!
//! Set `RUST_LOG=debug` to see every birth and death.

mod arena;

use std::time::Instant;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use eco_agent::{AgentState, Message};
use eco_behavior::{Addition, AgentEvent, AgentOf, Behavior, BehaviorResult, Commands, StepContext};
use eco_core::{AgentId, Motion, Point2, PopulationKey, Projection, SimConfig, SimRng, Step};
use eco_sim::{SimBuilder, SimObserver, StepSummary, TracingObserver};
use eco_space::Entry;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:          u64   = 7;
const STEPS:         u64   = 400;
const FORAGERS:      usize = 80;
const HUNTERS:       usize = 6;
const REPORT_EVERY:  u64   = 25;

const FORAGER: &str = "forager";
const HUNTER:  &str = "hunter";

// ── Agent state ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Kind {
    Forager,
    Hunter,
}

#[derive(Clone, Debug)]
struct Critter {
    kind: Kind,
    energy: f64,
}

impl AgentState for Critter {}

/// "A hunter was seen here."
#[derive(Copy, Clone, Debug)]
struct Alarm(Point2);

// ── Behaviour ─────────────────────────────────────────────────────────────────

struct Ecology {
    graze: f64,
    metabolism: f64,
    meal: f64,
    split_at: f64,
    sight: f64,
    reach: f64,
    stride: f64,
}

impl Behavior for Ecology {
    type State = Critter;
    type Message = Alarm;
    /// Energy handed to the offspring.
    type Heritage = f64;

    fn act(&self, agent: &mut AgentOf<Self>, ctx: &StepContext<'_>, cmds: &mut Commands<Self>) -> BehaviorResult<()> {
        let me = agent.id();
        let Some(here) = ctx.projection(me) else {
            return Ok(());
        };

        agent.state.energy -= self.metabolism;
        if agent.state.energy <= 0.0 {
            cmds.remove(me);
            cmds.log_event(me, "ecology", format!("{} starved", agent.population()));
            return Ok(());
        }

        match agent.state.kind {
            Kind::Forager => self.forage(agent, here, ctx, cmds),
            Kind::Hunter => self.hunt(agent, here, ctx, cmds),
        }

        if agent.state.energy >= self.split_at {
            let share = agent.state.energy / 2.0;
            agent.state.energy -= share;
            cmds.spawn(Addition::new(agent.population().clone(), here).with_heritage(share));
        }
        Ok(())
    }

    fn inherit(&self, agent: &mut AgentOf<Self>, energy: f64) {
        agent.state.energy = energy;
    }
}

impl Ecology {
    fn forage(&self, agent: &mut AgentOf<Self>, here: Projection, ctx: &StepContext<'_>, cmds: &mut Commands<Self>) {
        let me = agent.id();
        agent.state.energy += self.graze;

        let threat = agent
            .messages()
            .map(|m| m.content.0)
            .min_by(|a, b| here.position.distance_2(*a).total_cmp(&here.position.distance_2(*b)));
        agent.motion = match threat {
            Some(at) => Motion::toward(here.orientation, heading(at, here.position), self.stride * 1.5),
            None => Motion::new(agent.rng.gen_range(-0.6..0.6), self.stride),
        };

        let seen = ctx.visible_neighbours(me, self.sight);
        if let Some(hunter) = seen.iter().find(|e| is(e, HUNTER)) {
            let flock: Vec<AgentId> = seen.iter().filter(|e| is(e, FORAGER)).map(|e| e.id).collect();
            if !flock.is_empty() {
                cmds.send(Message::new(me, flock, Alarm(hunter.position())));
            }
        }
    }

    fn hunt(&self, agent: &mut AgentOf<Self>, here: Projection, ctx: &StepContext<'_>, cmds: &mut Commands<Self>) {
        let me = agent.id();
        let prey = ctx
            .visible_neighbours(me, self.sight)
            .into_iter()
            .filter(|e| is(e, FORAGER))
            .min_by(|a, b| {
                here.position.distance_2(a.position()).total_cmp(&here.position.distance_2(b.position()))
            });

        agent.motion = match prey {
            Some(prey) if prey.position().distance(here.position) <= self.reach => {
                // Two hunters may reach the same forager; the first claim wins.
                if ctx.snapshot.insert_if_absent(format!("caught:{}", prey.id), me) {
                    cmds.remove(prey.id);
                    agent.state.energy += self.meal;
                    cmds.log_event(me, "hunt", format!("caught {}", prey.id));
                }
                Motion::NONE
            }
            Some(prey) => Motion::toward(here.orientation, heading(here.position, prey.position()), self.stride * 1.2),
            None => Motion::new(agent.rng.gen_range(-0.4..0.4), self.stride),
        };
    }
}

fn is(entry: &Entry, population: &str) -> bool {
    entry.population.as_str() == population
}

/// Heading from `from` toward `to` (y grows south).
fn heading(from: Point2, to: Point2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Counts births, deaths and kills, and forwards everything to tracing.
#[derive(Default)]
struct Census {
    births: usize,
    deaths: usize,
    kills: usize,
}

struct Reporter {
    inner: TracingObserver,
    census: std::sync::Arc<std::sync::Mutex<Census>>,
}

impl SimObserver for Reporter {
    fn on_step_end(&mut self, summary: &StepSummary) {
        self.inner.on_step_end(summary);
    }

    fn on_agent_created(&mut self, step: Step, agent: AgentId, population: &PopulationKey) {
        if let Ok(mut c) = self.census.lock() {
            c.births += 1;
        }
        self.inner.on_agent_created(step, agent, population);
    }

    fn on_agent_removed(&mut self, step: Step, agent: AgentId, population: &PopulationKey) {
        if let Ok(mut c) = self.census.lock() {
            c.deaths += 1;
        }
        self.inner.on_agent_removed(step, agent, population);
    }

    fn on_agent_event(&mut self, step: Step, event: &AgentEvent) {
        if event.source == "hunt" {
            if let Ok(mut c) = self.census.lock() {
                c.kills += 1;
            }
        }
        self.inner.on_agent_event(step, event);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== foraging: rust_eco ===");
    println!("Arena: {}×{}  |  Foragers: {FORAGERS}  |  Hunters: {HUNTERS}  |  Steps: {STEPS}", arena::WIDTH, arena::HEIGHT);
    println!();

    let census = std::sync::Arc::new(std::sync::Mutex::new(Census::default()));
    let config = SimConfig {
        parallelization_threshold: 32,
        seed: SEED,
        total_steps: STEPS,
        ..SimConfig::new(arena::WIDTH, arena::HEIGHT)
    };
    let behavior = Ecology {
        graze: 0.35,
        metabolism: 0.25,
        meal: 6.0,
        split_at: 12.0,
        sight: 4.0,
        reach: 0.6,
        stride: 0.4,
    };

    let mut sim = SimBuilder::new(config, behavior)
        .walls(arena::walls()?)
        .prototype(FORAGER, Critter { kind: Kind::Forager, energy: 6.0 })
        .prototype(HUNTER, Critter { kind: Kind::Hunter, energy: 10.0 })
        .capacity(FORAGER, FORAGERS)
        .observer(Reporter { inner: TracingObserver, census: census.clone() })
        .build()?;

    let mut rng = SimRng::new(SEED);
    let mut place = |population: &str| {
        let x = rng.gen_range(0.0..arena::WIDTH as f64);
        let y = rng.gen_range(0.0..arena::HEIGHT as f64);
        Addition::new(population, Projection::at(x, y))
    };
    for _ in 0..FORAGERS {
        sim.spawn(place(FORAGER))?;
    }
    for _ in 0..HUNTERS {
        sim.spawn(place(HUNTER))?;
    }

    let t0 = Instant::now();
    while sim.step() < sim.config().end_step() {
        let summary = sim.next_step()?;
        if (summary.step.0 + 1) % REPORT_EVERY == 0 {
            println!(
                "{:>5}  foragers {:>4}  hunters {:>3}  messages {:>4}",
                summary.step,
                sim.count_agents_of(FORAGER),
                sim.count_agents_of(HUNTER),
                summary.delivered,
            );
        }
        if sim.count_agents() == 0 {
            println!("Everyone died at {}", summary.step);
            break;
        }
    }
    let elapsed = t0.elapsed();

    let c = census.lock().map_err(|_| anyhow::anyhow!("census lock poisoned"))?;
    println!();
    println!("Births: {}  |  Deaths: {}  |  Kills: {}", c.births, c.deaths, c.kills);
    let stats = sim.pool().stats(&PopulationKey::from(FORAGER)).unwrap_or_default();
    println!("Forager pool: {} created, {} recycled", stats.created, stats.recycled);
    println!("Ran {} steps in {:.2?}", sim.step().0, elapsed);
    Ok(())
}
