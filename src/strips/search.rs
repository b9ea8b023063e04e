//! State-space search over ground actions.
//!
//! The three strategies differ in how they remember visited states:
//! * depth-first gives every recursive call its own copy of the visited set,
//!   inherited from its parent and shared only with its later siblings, so a state
//!   can be reached again through a different ancestor path (which is how distinct
//!   solutions through common states are found) but never twice on one path;
//! * breadth-first and A* share a single visited set for the whole search, and a
//!   state is expanded at most once.

use std::cmp::Reverse;
use std::collections::{HashSet, VecDeque};

use priority_queue::PriorityQueue;
use serde::Serialize;

use super::action::GroundAction;
use super::grounding::{is_goal, Grounder};
use super::problem::Problem;
use super::state::State;
use crate::config::Strategy;
use crate::error::Error;

/// One plan: the number of steps and each ground action rendered as `name v1 v2 ...`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub steps: usize,
    pub path: Vec<String>,
}

struct PathNode {
    state: State,
    action: Option<GroundAction>,
    parent: Option<usize>,
    depth: usize,
}

/// Arena of search nodes linked to their parents by index.
struct Trail {
    nodes: Vec<PathNode>,
}

impl Trail {
    fn new(root: State) -> Trail {
        Trail { nodes: vec![PathNode { state: root, action: None, parent: None, depth: 0 }] }
    }

    fn push(&mut self, state: State, action: GroundAction, parent: usize) -> usize {
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(PathNode { state, action: Some(action), parent: Some(parent), depth });
        self.nodes.len() - 1
    }

    #[inline]
    fn state(&self, node: usize) -> &State {
        &self.nodes[node].state
    }

    #[inline]
    fn depth(&self, node: usize) -> usize {
        self.nodes[node].depth
    }

    fn solution(&self, node: usize) -> Solution {
        let mut path = Vec::new();
        let mut current = &self.nodes[node];
        while let (Some(action), Some(parent)) = (&current.action, current.parent) {
            path.push(action.to_string());
            current = &self.nodes[parent];
        }
        path.reverse();
        Solution { steps: self.nodes[node].depth, path }
    }
}

/// Solves `problem` with the configured strategy. Supplying a heuristic selects A*,
/// which returns at most one solution; the other strategies return up to
/// `max_solutions`.
pub fn solve(grounder: &Grounder, problem: &Problem, heuristic: Option<&dyn Fn(&State) -> i64>) -> Result<Vec<Solution>, Error> {
    let strategy = if heuristic.is_some() { Strategy::AStar } else { grounder.config().strategy };
    grounder.progress(|| format!("Using {}.", strategy));
    match (strategy, heuristic) {
        (Strategy::AStar, Some(h)) => Ok(solve_astar(grounder, &problem.init, &problem.goal, h)),
        (Strategy::AStar, None) => {
            let e = Error::MissingHeuristic;
            grounder.sink().error(&e.to_string());
            Err(e)
        }
        (Strategy::DepthFirst, _) => Ok(solve_dfs(grounder, &problem.init, &problem.goal)),
        (Strategy::BreadthFirst, _) => Ok(solve_bfs(grounder, &problem.init, &problem.goal)),
    }
}

pub fn solve_dfs(grounder: &Grounder, init: &State, goal: &State) -> Vec<Solution> {
    let mut trail = Trail::new(init.clone());
    let mut visited = HashSet::new();
    visited.insert(init.clone());
    dfs(grounder, &mut trail, 0, goal, &visited)
}

fn dfs(grounder: &Grounder, trail: &mut Trail, node: usize, goal: &State, inherited: &HashSet<State>) -> Vec<Solution> {
    if is_goal(trail.state(node), goal) {
        return vec![trail.solution(node)];
    }
    let max_solutions = grounder.config().max_solutions;
    let mut visited = inherited.clone();
    let mut solutions = Vec::new();
    let children = grounder.child_states(trail.state(node));
    grounder.progress(|| format!("Depth: {}, {} child states.", trail.depth(node), children.len()));
    for (action, child) in children {
        if !visited.insert(child.clone()) {
            continue;
        }
        let mark = trail.nodes.len();
        let next = trail.push(child, action, node);
        let found = dfs(grounder, trail, next, goal, &visited);
        // Solutions are already rendered, so only the ancestor chain has to stay.
        trail.nodes.truncate(mark);
        for solution in found {
            solutions.push(solution);
            if solutions.len() >= max_solutions {
                return solutions;
            }
        }
    }
    solutions
}

pub fn solve_bfs(grounder: &Grounder, init: &State, goal: &State) -> Vec<Solution> {
    let max_solutions = grounder.config().max_solutions;
    let mut trail = Trail::new(init.clone());
    let mut fringe = VecDeque::from([0]);
    let mut visited = HashSet::new();
    let mut solutions = Vec::new();

    while let Some(current) = fringe.pop_front() {
        let first_visit = visited.insert(trail.state(current).clone());
        if is_goal(trail.state(current), goal) {
            solutions.push(trail.solution(current));
            if solutions.len() >= max_solutions {
                return solutions;
            }
        } else if first_visit {
            for (action, child) in grounder.child_states(trail.state(current)) {
                if !visited.contains(&child) {
                    let next = trail.push(child, action, current);
                    fringe.push_back(next);
                }
            }
        }
        grounder.progress(|| format!("Depth: {}, {} child states.", trail.depth(current), fringe.len()));
    }
    solutions
}

/// A* where `g` is the path length and `h` is `heuristic(state)`. Ties on `g + h`
/// go to the node that entered the fringe first. Returns the first solution found.
pub fn solve_astar<H: Fn(&State) -> i64>(grounder: &Grounder, init: &State, goal: &State, heuristic: H) -> Vec<Solution> {
    let mut trail = Trail::new(init.clone());
    let mut fringe = PriorityQueue::new();
    let mut visited = HashSet::new();
    // Node indices grow with insertion, so they double as the tie breaker.
    fringe.push(0usize, Reverse((heuristic(init), 0usize)));

    while let Some((current, Reverse((cost, _)))) = fringe.pop() {
        let first_visit = visited.insert(trail.state(current).clone());
        if is_goal(trail.state(current), goal) {
            return vec![trail.solution(current)];
        }
        if !first_visit {
            continue;
        }
        let g = trail.depth(current) + 1;
        for (action, child) in grounder.child_states(trail.state(current)) {
            if !visited.contains(&child) {
                let h = heuristic(&child);
                let next = trail.push(child, action, current);
                fringe.push(next, Reverse(((g as i64).saturating_add(h), next)));
            }
        }
        grounder.progress(|| format!("Depth: {}, Current cost: {}, {} child states.", trail.depth(current), cost, fringe.len()));
    }
    Vec::new()
}
