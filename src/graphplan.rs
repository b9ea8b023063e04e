//! GraphPlan: a levelled planning graph annotated with mutual exclusions, and
//! backward plan extraction over it.

pub mod extract;
pub mod graph;
pub mod mutex;

pub use extract::{solve, Plan};
pub use graph::{Item, Layer, LiteralNode, PlanningGraph};
pub use mutex::{Mutex, MutexReason};
