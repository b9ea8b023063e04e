pub mod action;
pub mod domain;
pub mod grounding;
pub mod literal;
pub mod problem;
pub mod search;
pub mod state;

pub use crate::error::Error;
pub use action::{ActionSchema, Bindings, GroundAction, Parameter, NOOP};
pub use domain::{Domain, Requirement, Values};
pub use grounding::{apply_action, is_goal, is_precondition_satisfied, parameter_combinations, Grounder};
pub use literal::{Literal, Polarity};
pub use problem::{Object, Problem};
pub use search::{solve, solve_astar, solve_bfs, solve_dfs, Solution};
pub use state::State;
