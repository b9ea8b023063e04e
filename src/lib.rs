//! STRIPS planning over already-parsed domains and problems.
//!
//! [`strips`] grounds action schemas and searches the state space depth-first,
//! breadth-first or with A*. [`graphplan`] builds a planning graph and extracts
//! a layered plan from it. Both take a [`strips::Grounder`], which carries the
//! [`config::PlannerConfig`] and the [`sink::Sink`] that receives diagnostics.

pub mod config;
pub mod error;
pub mod graphplan;
pub mod sink;
pub mod strips;

pub use config::{PlannerConfig, Strategy};
pub use error::Error;
pub use sink::{MemorySink, Sink, TracingSink, WriterSink};
