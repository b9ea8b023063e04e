//! Backward plan extraction over a planning graph.

use std::collections::HashSet;
use std::fmt;

use itertools::Itertools;

use super::graph::PlanningGraph;
use crate::error::Error;
use crate::strips::{is_goal, GroundAction, Grounder, Problem, State};

/// Actions grouped by step. Actions in one step are pairwise non-exclusive and
/// may run in any order; no-ops are left out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    pub layers: Vec<Vec<GroundAction>>,
}

impl Plan {
    fn new(layers: Vec<Vec<GroundAction>>) -> Plan {
        Plan { layers: layers.into_iter().filter(|l| !l.is_empty()).collect() }
    }

    /// Every action, step by step.
    pub fn sequence(&self) -> Vec<&GroundAction> {
        self.layers.iter().flatten().collect()
    }

    pub fn steps(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, layer) in self.layers.iter().enumerate() {
            let actions = layer.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ");
            writeln!(f, "{}: {}", i + 1, actions)?;
        }
        Ok(())
    }
}

/// Goal sets already shown to be unreachable from a given layer.
pub type NoGoods = HashSet<(usize, State)>;

/// Runs GraphPlan: extracts from the graph as built so far, growing it one layer
/// per failure. Stops with `None` at `max_layers`, or, without a cap, once the
/// graph has levelled off and a further layer finds no new failures at the
/// level-off layer.
pub fn solve(grounder: &Grounder, problem: &Problem) -> Result<Option<Plan>, Error> {
    let bounds = &grounder.config().graph;
    if is_goal(&problem.init, &problem.goal) {
        return Ok(Some(Plan::default()));
    }

    let mut graph = PlanningGraph::new(grounder, &problem.init);
    while graph.len() < bounds.min_layers {
        graph.grow();
    }
    let mut nogoods = NoGoods::new();
    let mut settled = None;
    loop {
        grounder.progress(|| format!("Processing graph at layer {}.", graph.len()));
        if let Some(layers) = extract(&graph, &mut nogoods, graph.len() - 1, &problem.goal) {
            return Ok(Some(Plan::new(layers)));
        }
        if bounds.max_layers.map_or(false, |max| graph.len() >= max) {
            return Ok(None);
        }
        if let Some(level) = graph.leveled_at() {
            let failures = nogoods.iter().filter(|(layer, _)| *layer == level).count();
            if settled == Some(failures) {
                return Ok(None);
            }
            settled = Some(failures);
        }
        graph.grow();
    }
}

/// Finds actions in layers `0..=layer` achieving `goals` at the literal level
/// that `layer` produces. The result is ordered from the first layer up.
pub fn extract(graph: &PlanningGraph, nogoods: &mut NoGoods, layer: usize, goals: &State) -> Option<Vec<Vec<GroundAction>>> {
    let key = (layer, goals.clone());
    if nogoods.contains(&key) {
        return None;
    }
    let found = support(graph, nogoods, layer, goals);
    if found.is_none() {
        nogoods.insert(key);
    }
    found
}

fn support(graph: &PlanningGraph, nogoods: &mut NoGoods, layer: usize, goals: &State) -> Option<Vec<Vec<GroundAction>>> {
    let level = &graph.layers()[layer];
    let mut nodes = Vec::with_capacity(goals.len());
    for goal in goals.literals() {
        match level.literal(goal) {
            Some(node) => nodes.push(node),
            // Nothing ever asserted the atom, so its negation holds trivially.
            None if goal.is_negative() && level.literal(&goal.atom()).is_none() => {}
            None => return None,
        }
    }
    if nodes.iter().tuple_combinations().any(|(&a, &b)| level.literals[a].is_mutex_with(b)) {
        return None;
    }

    let choices: Vec<Vec<usize>> = nodes.iter().map(|&n| level.literals[n].producers.clone()).collect();
    let combinations: Box<dyn Iterator<Item = Vec<usize>>> = if choices.is_empty() {
        Box::new(std::iter::once(Vec::new()))
    } else {
        Box::new(choices.into_iter().multi_cartesian_product())
    };

    for mut chosen in combinations {
        chosen.sort_unstable();
        chosen.dedup();
        if let Some((a, b)) = chosen.iter().tuple_combinations().find(|(&a, &b)| level.items[a].is_mutex_with(b)) {
            graph.grounder().progress(|| {
                format!("Failed due to mutex between {} and {}", level.items[*a].action, level.items[*b].action)
            });
            continue;
        }
        let subgoals: State = chosen.iter().flat_map(|&i| level.items[i].action.precondition.iter().cloned()).collect();
        let below = if layer == 0 {
            Some(Vec::new()).filter(|_| is_goal(graph.init(), &subgoals))
        } else {
            extract(graph, nogoods, layer - 1, &subgoals)
        };
        if let Some(mut layers) = below {
            let actions: Vec<GroundAction> = chosen
                .iter()
                .map(|&i| &level.items[i].action)
                .filter(|a| !a.is_noop())
                .cloned()
                .collect();
            graph.grounder().progress(|| format!("Satisfied goals at layer {} with {} actions.", layer, actions.len()));
            layers.push(actions);
            return Some(layers);
        }
    }
    None
}
