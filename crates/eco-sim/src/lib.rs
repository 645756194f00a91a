//! `eco-sim`: the phased step engine.
//!
//! # One step
//!
//! ```text
//! next_step():
//!   PLANNING      ① split active agents into chunks of `parallelization_threshold`
//!                 ② run Behavior::act for each chunk on the worker pool
//!                 ③ barrier: wait for every chunk, merge command buffers in order
//!   MODIFICATION  ④ validate queued additions (nothing applied on failure)
//!                 ⑤ deliveries → removals → movement (parallel) → activations
//!                 ⑥ clear the step snapshot
//!   IDLE          ⑦ step += 1
//! ```
//!
//! During ①–③ agents only read the world and append to their task's
//! `Commands`; the space, population index and pool are touched only by the
//! stepping thread in ⑤, except for the movement sub-phase which rewrites
//! disjoint positions in parallel.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(SimConfig::new(20, 20), MyBehavior)
//!     .prototype("prey", PreyState::default())
//!     .walls(load_walls_csv(Path::new("walls.csv"))?)
//!     .observer(TracingObserver)
//!     .build()?;
//! sim.enqueue_addition(Addition::new("prey", Projection::at(1.5, 1.5)));
//! sim.run_steps(100)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod queues;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, StepSummary, TracingObserver};
pub use queues::MutationQueues;
pub use sim::{Phase, Sim};
